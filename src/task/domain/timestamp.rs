//! Timestamp parsing and normalization.
//!
//! All comparisons in the task core happen in UTC. Values that arrive
//! without zone information (naive database columns, form input such as
//! `2026-03-01 17:00`) are interpreted as UTC wall-clock time.

use super::TaskDomainError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Interprets a naive timestamp in the canonical zone.
#[must_use]
pub fn normalize_naive(naive: NaiveDateTime) -> DateTime<Utc> {
    Utc.from_utc_datetime(&naive)
}

/// Parses a timestamp with or without an explicit offset.
///
/// Accepts RFC 3339 (any offset, converted to UTC), naive date-times with
/// seconds or minutes precision, and bare dates (midnight).
///
/// # Errors
///
/// Returns [`TaskDomainError::InvalidTimestamp`] when no supported format
/// matches.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, TaskDomainError> {
    let trimmed = raw.trim();
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(with_offset.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(normalize_naive(naive));
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(normalize_naive)
        .ok_or_else(|| TaskDomainError::InvalidTimestamp(raw.to_owned()))
}

/// Parses an optional timestamp field where a blank value means "unset".
///
/// # Errors
///
/// Returns [`TaskDomainError::InvalidTimestamp`] when a non-blank value does
/// not parse.
pub fn parse_optional_timestamp(raw: &str) -> Result<Option<DateTime<Utc>>, TaskDomainError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse_timestamp(raw).map(Some)
}
