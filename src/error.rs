//! Error taxonomy for the scrape pipeline
//!
//! Only two failures are fatal: the page could not be rendered, or it
//! rendered but yielded zero day records. Row- and container-level parse
//! misses are absorbed where they occur and never surface here.

use thiserror::Error;

/// Maximum length of the markup preview attached to fatal errors.
const PREVIEW_CHARS: usize = 500;

#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Browser launch, navigation or content-wait failure.
    #[error("render failed: {reason}")]
    Render {
        reason: String,
        preview: Option<String>,
    },

    /// Page rendered but no day container produced a usable record.
    #[error("no tide data found in rendered page (markup drift or block page?)")]
    EmptyExtraction { preview: String },
}

impl ScrapeError {
    pub fn render(reason: impl Into<String>) -> Self {
        Self::Render {
            reason: reason.into(),
            preview: None,
        }
    }

    pub fn render_with_preview(reason: impl Into<String>, html: &str) -> Self {
        Self::Render {
            reason: reason.into(),
            preview: Some(markup_preview(html)),
        }
    }

    /// Truncated markup captured at the point of failure, for manual triage.
    pub fn preview(&self) -> Option<&str> {
        match self {
            Self::Render { preview, .. } => preview.as_deref(),
            Self::EmptyExtraction { preview } => Some(preview),
        }
    }
}

/// Truncate markup to a short preview, respecting char boundaries.
pub fn markup_preview(html: &str) -> String {
    if html.len() <= PREVIEW_CHARS {
        return html.to_string();
    }
    let mut end = PREVIEW_CHARS;
    while !html.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &html[..end])
}
