//! tide-scrape: headless-Chrome scraper for the Playa del Inglés tide forecast
//!
//! Pipeline: render the forecast page, scan its day containers, normalize
//! times and heights, write `data/latest.json`.

pub mod browser;
pub mod config;
pub mod error;
pub mod extract;
pub mod normalize;
pub mod schema;
pub mod scrape;

pub use config::{ScrapeConfig, WaitPolicy};
pub use error::ScrapeError;
pub use schema::{DayRecord, Meta, TideEvent, TideKind, TideTable};
pub use scrape::{assemble, scrape, write_artifact};
