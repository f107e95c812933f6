//! Output schema for the tide artifact
//!
//! Wire field names stay compatible with the frontend that consumes
//! `latest.json`: German keys (`zeit`, `typ`, `hoehe_m`) and the
//! `Hochwasser`/`Niedrigwasser` vocabulary.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Top-level artifact: location metadata plus all extracted days.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TideTable {
    pub meta: Meta,
    pub days: Vec<DayRecord>,
}

/// Metadata about one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meta {
    pub location: String,
    pub timezone: String,
    /// UTC instant of pipeline execution.
    #[serde(rename = "generatedAt")]
    pub generated_at: DateTime<Utc>,
}

/// One calendar day's tide events, non-empty by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    /// Calendar date in the location's local calendar.
    pub date: NaiveDate,
    pub tides: Vec<TideEvent>,
}

/// One high or low water extremum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TideEvent {
    /// Wall-clock time of day, zero-padded 24-hour `HH:MM`.
    #[serde(rename = "zeit")]
    pub time: String,
    #[serde(rename = "typ")]
    pub kind: TideKind,
    /// Height relative to chart datum; negative and zero are valid.
    #[serde(rename = "hoehe_m")]
    pub height_m: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TideKind {
    #[serde(rename = "Hochwasser")]
    High,
    #[serde(rename = "Niedrigwasser")]
    Low,
}

impl std::fmt::Display for TideKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TideKind::High => write!(f, "Hochwasser"),
            TideKind::Low => write!(f, "Niedrigwasser"),
        }
    }
}
