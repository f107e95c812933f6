//! tides CLI
//!
//! Renders the tide-forecast page with headless Chrome and writes the
//! normalized JSON artifact the frontend consumes.

use anyhow::Result;
use clap::{Parser, Subcommand};

use tide_scrape::scrape::{run_scrape, ScrapeArgs};

#[derive(Parser)]
#[command(name = "tides")]
#[command(version)]
#[command(about = "Tide forecast scraper with headless Chrome")]
#[command(
    long_about = "Renders the tide-forecast page in headless Chrome, extracts all day-level tide tables and writes a normalized JSON artifact.\n\nCommands:\n  scrape    Run the full pipeline and write the artifact"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape the forecast page and write the JSON artifact
    Scrape(ScrapeArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scrape(args) => run_scrape(args).await,
    }
}
