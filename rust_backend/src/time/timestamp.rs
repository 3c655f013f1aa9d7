//! Lenient timestamp parsing for site export columns.
//!
//! Event exports mix ISO-8601 (with or without offsets), minute-precision
//! values and US-style dates. Every cell is parsed on its own; anything that
//! cannot be read becomes `None` instead of failing the row.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Tokens that loaders emit for empty cells.
const NULL_TOKENS: [&str; 6] = ["", "nat", "nan", "null", "none", "na"];

/// Formats carrying an explicit UTC offset. Parsed values are normalized to UTC.
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"];

/// Offset-free date-time formats, tried in order.
const NAIVE_FORMATS: [&str; 10] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
];

/// Date-only formats; the value is taken at midnight.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parse a single timestamp cell.
///
/// Returns `None` for blank cells, null tokens (`NaT`, `nan`, `null`, ...)
/// and anything that matches none of the supported formats.
///
/// # Example
/// ```
/// use site_kpi::time::parse_timestamp;
///
/// let ts = parse_timestamp("2023-01-01T00:10:00").unwrap();
/// assert_eq!(ts.to_string(), "2023-01-01 00:10:00");
/// assert!(parse_timestamp("not a time").is_none());
/// ```
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let value = raw.trim();
    if is_null_token(value) {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }

    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(value, fmt) {
            return Some(dt.naive_utc());
        }
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt);
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Parse an optional cell, treating a missing cell like a blank one.
pub fn parse_optional_timestamp(raw: Option<&str>) -> Option<NaiveDateTime> {
    raw.and_then(parse_timestamp)
}

/// Signed number of minutes from `start` to `end`, including fractions.
///
/// Negative when `end` precedes `start`.
pub fn minutes_between(start: NaiveDateTime, end: NaiveDateTime) -> f64 {
    let delta = end - start;
    match delta.num_microseconds() {
        Some(micros) => micros as f64 / 60_000_000.0,
        None => delta.num_milliseconds() as f64 / 60_000.0,
    }
}

fn is_null_token(value: &str) -> bool {
    NULL_TOKENS
        .iter()
        .any(|token| value.eq_ignore_ascii_case(token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_parse_iso_variants() {
        let expected = at(2023, 1, 1, 0, 10, 0);
        assert_eq!(parse_timestamp("2023-01-01T00:10:00"), Some(expected));
        assert_eq!(parse_timestamp("2023-01-01 00:10:00"), Some(expected));
        assert_eq!(parse_timestamp("2023-01-01 00:10"), Some(expected));
        assert_eq!(parse_timestamp("  2023-01-01T00:10:00  "), Some(expected));
    }

    #[test]
    fn test_parse_fractional_seconds() {
        let ts = parse_timestamp("2023-01-01 00:10:00.500").unwrap();
        assert_eq!(ts.nanosecond(), 500_000_000);
    }

    #[test]
    fn test_parse_offsets_normalize_to_utc() {
        let expected = at(2023, 1, 1, 10, 0, 0);
        assert_eq!(parse_timestamp("2023-01-01T12:00:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2023-01-01T10:00:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2023-01-01 05:00:00-05:00"), Some(expected));
    }

    #[test]
    fn test_parse_us_formats() {
        assert_eq!(
            parse_timestamp("03/15/2023 14:05"),
            Some(at(2023, 3, 15, 14, 5, 0))
        );
        assert_eq!(
            parse_timestamp("3/15/2023 2:05:30 PM"),
            Some(at(2023, 3, 15, 14, 5, 30))
        );
    }

    #[test]
    fn test_parse_date_only_is_midnight() {
        assert_eq!(parse_timestamp("2023-06-30"), Some(at(2023, 6, 30, 0, 0, 0)));
    }

    #[test]
    fn test_null_tokens_and_garbage_are_absent() {
        for raw in ["", "   ", "NaT", "nan", "NULL", "None", "yesterday", "2023-13-45"] {
            assert_eq!(parse_timestamp(raw), None, "expected absent for {:?}", raw);
        }
        assert_eq!(parse_optional_timestamp(None), None);
    }

    #[test]
    fn test_minutes_between() {
        let start = at(2023, 1, 1, 0, 0, 0);
        assert_eq!(minutes_between(start, at(2023, 1, 1, 0, 10, 0)), 10.0);
        assert_eq!(minutes_between(start, at(2023, 1, 1, 0, 0, 30)), 0.5);
        assert_eq!(minutes_between(at(2023, 1, 1, 0, 10, 0), start), -10.0);
    }
}
