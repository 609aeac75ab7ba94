//! Human-readable date formatting
//!
//! Absolute dates use the en-US medium form (`Jan 5, 2024, 02:07 PM`) and
//! relative dates count whole minutes, hours or days back from a clock.

use crate::error::{CoreResult, FormatError};
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use std::fmt::Display;

/// Text shown for a missing date
pub const NEVER: &str = "Never";

/// Text shown for a date that could not be parsed
pub const INVALID_DATE: &str = "Invalid Date";

const MS_PER_MINUTE: i64 = 60_000;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

const DISPLAY_FORMAT: &str = "%b %-d, %Y, %I:%M %p";

/// Format a date in its own time zone, or `"Never"` when absent.
pub fn format_date<Tz>(date: Option<&DateTime<Tz>>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match date {
        Some(date) => date.format(DISPLAY_FORMAT).to_string(),
        None => NEVER.to_string(),
    }
}

/// Format a UTC instant in the local time zone of the running platform.
pub fn format_date_local(date: Option<DateTime<Utc>>) -> String {
    format_date(date.map(|date| date.with_timezone(&Local)).as_ref())
}

/// Format a timestamp string.
///
/// Empty input is treated as absent. Input that does not parse yields
/// `"Invalid Date"` rather than an error, matching what the page showed
/// before.
pub fn format_date_str(input: &str) -> String {
    if input.trim().is_empty() {
        return NEVER.to_string();
    }
    match parse_timestamp(input) {
        Ok(date) => format_date_local(Some(date)),
        Err(_) => INVALID_DATE.to_string(),
    }
}

/// Describe how long ago `date` was, measured against the current clock.
pub fn format_relative_time(date: Option<DateTime<Utc>>) -> String {
    format_relative_time_at(date, Utc::now())
}

/// Describe how long ago `date` was, measured against `now`.
///
/// Dates in the future read as `"Just now"`.
pub fn format_relative_time_at(date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(date) = date else {
        return NEVER.to_string();
    };

    let diff = (now - date).num_milliseconds();
    let minutes = diff.div_euclid(MS_PER_MINUTE);
    let hours = diff.div_euclid(MS_PER_HOUR);
    let days = diff.div_euclid(MS_PER_DAY);

    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        ago(minutes, "minute")
    } else if hours < 24 {
        ago(hours, "hour")
    } else {
        ago(days, "day")
    }
}

/// Relative form of a timestamp string; see [`format_date_str`] for parsing.
pub fn format_relative_time_str(input: &str) -> String {
    if input.trim().is_empty() {
        return NEVER.to_string();
    }
    match parse_timestamp(input) {
        Ok(date) => format_relative_time(Some(date)),
        Err(_) => INVALID_DATE.to_string(),
    }
}

/// Parse an RFC 3339 timestamp, a `YYYY-MM-DD` date or bare `YYYY` year
/// (both UTC midnight), or a count of epoch milliseconds.
///
/// A string of exactly four digits is a year, not a millisecond count.
pub fn parse_timestamp(input: &str) -> CoreResult<DateTime<Utc>> {
    let input = input.trim();

    if input.len() == 4 && input.bytes().all(|b| b.is_ascii_digit()) {
        return input
            .parse::<i32>()
            .ok()
            .and_then(|year| Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).single())
            .ok_or_else(|| FormatError::invalid_timestamp(input));
    }

    if let Ok(millis) = input.parse::<i64>() {
        return from_epoch_millis(millis);
    }

    if let Ok(date) = DateTime::parse_from_rfc3339(input) {
        return Ok(date.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| FormatError::invalid_timestamp(input))
}

/// Convert epoch milliseconds into a UTC instant.
pub fn from_epoch_millis(millis: i64) -> CoreResult<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or(FormatError::OutOfRange { millis })
}

fn ago(count: i64, unit: &str) -> String {
    let plural = if count == 1 { "" } else { "s" };
    format!("{count} {unit}{plural} ago")
}
