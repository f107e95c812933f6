//! Pipeline configuration
//!
//! One immutable value passed into the pipeline entry point. The production
//! constants live in `Default`; tests construct arbitrary fixtures instead of
//! touching global state.

use std::path::PathBuf;

/// How long to let the page settle before capturing markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitPolicy {
    /// Poll until network activity is quiet (slower, robust against
    /// script-driven late rendering).
    NetworkIdle,
    /// Wait for the base document, then a fixed settle delay.
    DomSettle,
}

#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Target forecast page.
    pub url: String,
    /// Display name of the monitored site.
    pub location: String,
    /// IANA zone identifier for the location.
    pub timezone: String,
    /// Artifact path; parent directories are created on demand.
    pub output: PathBuf,
    /// Navigation timeout in milliseconds.
    pub nav_timeout_ms: u64,
    /// Budget for waiting on recognized content containers, in milliseconds.
    pub content_timeout_ms: u64,
    /// Fixed settle delay for [`WaitPolicy::DomSettle`], in milliseconds.
    pub settle_ms: u64,
    pub wait: WaitPolicy,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            url: "https://www.tide-forecast.com/locations/Playa-del-Ingles/tides/latest"
                .to_string(),
            location: "Playa del Inglés".to_string(),
            timezone: "Atlantic/Canary".to_string(),
            output: PathBuf::from("data/latest.json"),
            nav_timeout_ms: 60_000,
            content_timeout_ms: 30_000,
            settle_ms: 2_000,
            wait: WaitPolicy::NetworkIdle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_targets_playa_del_ingles() {
        let config = ScrapeConfig::default();
        assert!(config.url.contains("Playa-del-Ingles"));
        assert_eq!(config.timezone, "Atlantic/Canary");
        assert_eq!(config.output, PathBuf::from("data/latest.json"));
        assert_eq!(config.wait, WaitPolicy::NetworkIdle);
    }
}
