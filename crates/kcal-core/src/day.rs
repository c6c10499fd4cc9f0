//! UTC calendar-day arithmetic.
//!
//! A day is the half-open interval `[date 00:00:00.000 UTC, next date 00:00 UTC)`.
//! Stores are queried with these two absolute instants and never by
//! extracting the date part of a stored timestamp.

use std::sync::LazyLock;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use regex::Regex;

use crate::types::ValidationError;

/// Wire format of a calendar date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Zero-padded `YYYY-MM-DD`; chrono alone also accepts `2024-1-5`.
static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap());

/// Parses a strict `YYYY-MM-DD` calendar date.
///
/// Every accepted date round-trips through [`format_date`].
pub fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
    let invalid = || ValidationError::InvalidDate {
        value: value.to_string(),
    };

    if !DATE_RE.is_match(value) {
        return Err(invalid());
    }

    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| invalid())
}

/// Formats a date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Returns the half-open UTC interval covering `date`.
pub fn day_boundaries(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = date.and_time(NaiveTime::MIN).and_utc();
    let end = start
        .checked_add_signed(Duration::days(1))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);
    (start, end)
}
