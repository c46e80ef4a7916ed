//! Timestamp parsing for persisted prediction logs
//!
//! Logs written by this crate use ISO-8601, but older logs carry
//! spreadsheet-style `MM/DD/YYYY HH:MM` stamps, sometimes mixed. A whole
//! column is parsed with an ordered cascade:
//!
//! 1. ISO-8601 for every value
//! 2. `%m/%d/%Y %H:%M` for every value
//! 3. each value independently against every known format
//!
//! If any value fails step 3 the column is rejected. Offsets are dropped
//! after conversion to the wall-clock time they denote.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unparseable timestamp '{value}' at record {index}")]
pub struct TimestampError {
    pub index: usize,
    pub value: String,
}

const SPREADSHEET_FORMAT: &str = "%m/%d/%Y %H:%M";

const ISO_NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
];

const MIXED_DATETIME_FORMATS: &[&str] = &[
    SPREADSHEET_FORMAT,
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
];

const MIXED_DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d"];

/// Parse an ISO-8601 timestamp, with or without offset.
pub fn parse_iso8601(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.naive_local());
    }
    ISO_NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| date_at_midnight(s, "%Y-%m-%d"))
}

fn parse_spreadsheet(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), SPREADSHEET_FORMAT).ok()
}

fn date_at_midnight(s: &str, fmt: &str) -> Option<NaiveDateTime> {
    NaiveDate::parse_from_str(s, fmt)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Parse one value against every supported format.
pub fn parse_lenient(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    parse_iso8601(s)
        .or_else(|| {
            MIXED_DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        })
        .or_else(|| {
            MIXED_DATE_FORMATS
                .iter()
                .find_map(|fmt| date_at_midnight(s, fmt))
        })
}

/// Parse a column of timestamps with the uniform-then-mixed cascade.
pub fn parse_column<S: AsRef<str>>(values: &[S]) -> Result<Vec<NaiveDateTime>, TimestampError> {
    let uniform = |parse: fn(&str) -> Option<NaiveDateTime>| -> Option<Vec<NaiveDateTime>> {
        values.iter().map(|v| parse(v.as_ref())).collect()
    };

    if let Some(parsed) = uniform(parse_iso8601) {
        return Ok(parsed);
    }
    if let Some(parsed) = uniform(parse_spreadsheet) {
        tracing::debug!(count = values.len(), "Timestamps parsed as MM/DD/YYYY HH:MM");
        return Ok(parsed);
    }

    tracing::debug!(count = values.len(), "Falling back to mixed timestamp formats");
    values
        .iter()
        .enumerate()
        .map(|(index, v)| {
            parse_lenient(v.as_ref()).ok_or_else(|| TimestampError {
                index,
                value: v.as_ref().to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, min, 0))
            .unwrap()
    }

    #[test]
    fn test_iso_variants() {
        assert_eq!(parse_iso8601("2024-03-01T10:15:00"), Some(at(2024, 3, 1, 10, 15)));
        assert_eq!(parse_iso8601("2024-03-01T10:15"), Some(at(2024, 3, 1, 10, 15)));
        assert_eq!(parse_iso8601("2024-03-01"), Some(at(2024, 3, 1, 0, 0)));
        let micro = parse_iso8601("2024-03-01T10:15:00.123456").unwrap();
        assert_eq!(micro.nanosecond(), 123_456_000);
    }

    #[test]
    fn test_offset_keeps_wall_clock() {
        assert_eq!(
            parse_iso8601("2024-03-01T10:15:00+02:00"),
            Some(at(2024, 3, 1, 10, 15))
        );
        assert_eq!(parse_iso8601("2024-03-01T10:15:00Z"), Some(at(2024, 3, 1, 10, 15)));
    }

    #[test]
    fn test_uniform_spreadsheet_column() {
        let parsed = parse_column(&["03/01/2024 10:15", "03/02/2024 23:59"]).unwrap();
        assert_eq!(parsed, vec![at(2024, 3, 1, 10, 15), at(2024, 3, 2, 23, 59)]);
    }

    #[test]
    fn test_mixed_column() {
        let parsed = parse_column(&["2024-03-01T10:15:00", "03/02/2024 08:00", "03/03/2024"]).unwrap();
        assert_eq!(parsed[1], at(2024, 3, 2, 8, 0));
        assert_eq!(parsed[2], at(2024, 3, 3, 0, 0));
    }

    #[test]
    fn test_unparseable_is_hard_error() {
        let err = parse_column(&["2024-03-01T10:15:00", "yesterday"]).unwrap_err();
        assert_eq!(err.index, 1);
        assert_eq!(err.value, "yesterday");
    }
}
