//! Date-time parsing shared by CSV cells and query parameters.
//!
//! Accepted forms:
//!
//! - `YYYY-MM-DD` (midnight)
//! - `YYYY-MM-DD HH:MM`, `YYYY-MM-DD HH:MM:SS`, optionally with fractional seconds
//! - the same with a `T` separator
//! - RFC 3339 with `Z` or a numeric offset, normalized to UTC

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::TimestampError;

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a date-time string into a zone-less timestamp.
///
/// # Errors
///
/// Returns `TimestampError` if the input matches none of the accepted forms.
pub fn parse_timestamp(input: &str) -> Result<NaiveDateTime, TimestampError> {
    let s = input.trim();

    for fmt in DATE_TIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(ts);
        }
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts.naive_utc());
    }

    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| TimestampError {
            input: input.to_string(),
        })
}
