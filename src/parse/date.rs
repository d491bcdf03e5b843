//! Change date parsing.

use chrono::{NaiveDate, NaiveDateTime};

use super::error::ParseError;

/// Marker the server appends to the date of a changelist not yet submitted.
pub const PENDING_MARKER: &str = "*pending*";

const DATE_TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y/%m/%d";

/// Remove the pending marker, returning the bare date text and whether the
/// marker was present.
#[must_use]
pub fn strip_pending(text: &str) -> (&str, bool) {
    match text.find(PENDING_MARKER) {
        Some(idx) => (text[..idx].trim(), true),
        None => (text.trim(), false),
    }
}

/// Parse a server date, with or without time of day.
///
/// A trailing `*pending*` marker is stripped before parsing, so
/// `2024/01/02 10:00:00 *pending*` and `2024/01/02 10:00:00` yield the same
/// timestamp.
///
/// # Errors
///
/// Returns `ParseError::InvalidDate` if neither format matches.
pub fn parse_date(text: &str) -> Result<NaiveDateTime, ParseError> {
    let (bare, _) = strip_pending(text);

    if let Ok(dt) = NaiveDateTime::parse_from_str(bare, DATE_TIME_FORMAT) {
        return Ok(dt);
    }

    NaiveDate::parse_from_str(bare, DATE_FORMAT)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| ParseError::InvalidDate(text.to_string()))
}
