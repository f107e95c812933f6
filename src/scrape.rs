//! scrape command: render the forecast page and write the JSON artifact
//!
//! Render → scan → assemble → persist, strictly sequential. Partial success
//! (some containers skipped) is success; zero extracted days is fatal and
//! leaves any previous artifact untouched.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;

use crate::browser::fetch_rendered;
use crate::config::{ScrapeConfig, WaitPolicy};
use crate::error::{markup_preview, ScrapeError};
use crate::extract::scan_days;
use crate::schema::{Meta, TideTable};

#[derive(Args)]
pub struct ScrapeArgs {
    /// Output file path
    #[arg(long, short, default_value = "data/latest.json")]
    pub out: PathBuf,

    /// Navigation timeout in milliseconds
    #[arg(long, default_value = "60000")]
    pub timeout: u64,

    /// Settle delay after DOM load in milliseconds (with --dom-settle)
    #[arg(long, default_value = "2000")]
    pub settle: u64,

    /// Wait for the base document plus a fixed settle delay instead of
    /// network idle
    #[arg(long)]
    pub dom_settle: bool,
}

/// Run the scrape command.
pub async fn run_scrape(args: ScrapeArgs) -> Result<()> {
    let config = ScrapeConfig {
        output: args.out,
        nav_timeout_ms: args.timeout,
        settle_ms: args.settle,
        wait: if args.dom_settle {
            WaitPolicy::DomSettle
        } else {
            WaitPolicy::NetworkIdle
        },
        ..ScrapeConfig::default()
    };

    eprintln!("Loading tides for {} ...", config.location);
    eprintln!("  -> {}", config.url);

    let table = match scrape(&config).await {
        Ok(table) => table,
        Err(err) => {
            if let Some(preview) = err.preview() {
                eprintln!("--- markup preview ---");
                eprintln!("{preview}");
            }
            return Err(err.into());
        }
    };

    for day in &table.days {
        eprintln!("  {}: {} tide events", day.date, day.tides.len());
    }

    write_artifact(&table, &config.output).await?;
    eprintln!(
        "Wrote {} ({} days)",
        config.output.display(),
        table.days.len()
    );

    Ok(())
}

/// Execute the extraction pipeline and assemble the result record.
pub async fn scrape(config: &ScrapeConfig) -> Result<TideTable, ScrapeError> {
    let html = fetch_rendered(config).await?;
    assemble(config, &html)
}

/// Scan rendered markup and wrap the extracted days with run metadata.
/// Zero days is always fatal, never an empty artifact.
pub fn assemble(config: &ScrapeConfig, html: &str) -> Result<TideTable, ScrapeError> {
    let days = scan_days(html);

    if days.is_empty() {
        return Err(ScrapeError::EmptyExtraction {
            preview: markup_preview(html),
        });
    }

    Ok(TideTable {
        meta: Meta {
            location: config.location.clone(),
            timezone: config.timezone.clone(),
            generated_at: Utc::now(),
        },
        days,
    })
}

/// Write the artifact as pretty-printed UTF-8 JSON, creating the output
/// directory if absent and overwriting any previous file.
pub async fn write_artifact(table: &TideTable, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    let json = serde_json::to_string_pretty(table)?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(())
}
