//! Timestamp helpers for the `Date_Time` column.

use crate::core::schemas::DATE_TIME_FORMAT;
use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};

/// Formats accepted when reading legacy rows, most specific first.
const LENIENT_FORMATS: &[&str] = &[
    DATE_TIME_FORMAT,
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

/// Local wall-clock time truncated to whole seconds, matching what the file
/// can represent.
pub fn now_local() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

pub fn format_date_time(ts: &NaiveDateTime) -> String {
    ts.format(DATE_TIME_FORMAT).to_string()
}

/// Parse a stored timestamp; `None` is the "unknown" sentinel.
pub fn parse_date_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    for fmt in LENIENT_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(ts);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Compact stamp used in export file names (e.g. `20261019_142501`).
pub fn file_stamp(ts: &NaiveDateTime) -> String {
    ts.format("%Y%m%d_%H%M%S").to_string()
}
