//! Calendar-date helpers for the `YYYY-MM-DD` strings the backend uses.

#[cfg(test)]
#[path = "dates_test.rs"]
mod dates_test;

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::error::ValidationError;

const ISO_DATE: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Today's date in the local time zone, or UTC when the offset is unknown.
#[must_use]
pub fn today() -> Date {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc()).date()
}

/// Render `date` as `YYYY-MM-DD`.
#[must_use]
pub fn format_iso_date(date: Date) -> String {
    // A calendar-only description cannot fail on a `Date`; `Display` is the
    // same shape.
    date.format(ISO_DATE).unwrap_or_else(|_| date.to_string())
}

/// Parse a strict `YYYY-MM-DD` date (surrounding whitespace ignored).
///
/// # Errors
///
/// Returns [`ValidationError::InvalidDate`] for anything else.
pub fn parse_iso_date(raw: &str) -> Result<Date, ValidationError> {
    Date::parse(raw.trim(), ISO_DATE).map_err(|_| ValidationError::InvalidDate(raw.to_owned()))
}

/// Canonical date string for a request: the given date validated, or today
/// when `raw` is absent or blank.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidDate`] if `raw` is present but malformed.
pub fn normalize_date(raw: Option<&str>) -> Result<String, ValidationError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(value) => parse_iso_date(value).map(format_iso_date),
        None => Ok(format_iso_date(today())),
    }
}
