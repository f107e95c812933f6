//! Text-to-value coercion for tide rows
//!
//! The forecast site renders times as `6:39 PM` or `06:17`, heights as dual
//! unit strings like `2.13 m (7 ft)`, and day headings as
//! `Wednesday 05 November 2025`. These helpers turn that text into typed
//! values; callers decide what a miss means.

use chrono::NaiveDate;
use regex::Regex;

/// Month-name table, pinned so heading parsing never depends on the process
/// locale.
const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Convert a clock-time string to zero-padded 24-hour `HH:MM`.
///
/// Accepts `H:MM`/`HH:MM` with an optional case-insensitive meridiem marker.
/// Without a marker the hour is taken as already 24-hour. Input that does not
/// match the pattern at all comes back trimmed but otherwise unchanged.
pub fn to_24h(raw: &str) -> String {
    let re = Regex::new(r"(\d{1,2}):(\d{2})\s*([AaPp][Mm])?").unwrap();
    let Some(cap) = re.captures(raw) else {
        return raw.trim().to_string();
    };

    let mut hour: u32 = match cap[1].parse() {
        Ok(h) => h,
        Err(_) => return raw.trim().to_string(),
    };
    let minute = &cap[2];

    if let Some(meridiem) = cap.get(3) {
        match meridiem.as_str().to_ascii_uppercase().as_str() {
            "PM" if hour < 12 => hour += 12,
            "AM" if hour == 12 => hour = 0,
            _ => {}
        }
    }

    format!("{hour:02}:{minute}")
}

/// Extract a signed height in meters from text like `2.13 m (7 ft)`.
///
/// Zero is a valid height and distinct from "no match"; only the absence of a
/// number followed by the meter marker yields `None`.
pub fn parse_height_m(raw: &str) -> Option<f64> {
    let re = Regex::new(r"(-?\d+(?:\.\d+)?)\s*m").unwrap();
    let cap = re.captures(raw)?;
    cap[1].parse().ok()
}

/// Parse a textual day heading of the form `<Weekday> <Day> <Month> <Year>`.
pub fn parse_day_heading(text: &str) -> Option<NaiveDate> {
    let re = Regex::new(r"([A-Za-z]+day)\s+(\d{1,2})\s+([A-Za-z]+)\s+(\d{4})").unwrap();
    let cap = re.captures(text)?;

    let day: u32 = cap[2].parse().ok()?;
    let month = month_number(&cap[3])?;
    let year: i32 = cap[4].parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parse the date part of a machine-readable `datetime` attribute.
pub fn parse_datetime_attr(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.trim().split(['T', ' ']).next()?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

fn month_number(name: &str) -> Option<u32> {
    MONTHS
        .iter()
        .position(|m| m.eq_ignore_ascii_case(name))
        .map(|i| i as u32 + 1)
}
