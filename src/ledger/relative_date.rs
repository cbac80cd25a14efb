//! Human-relative labels for transaction dates.

use crate::model::parse_timestamp;
use chrono::{DateTime, Local, Utc};

const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;

/// Whole days between `date` and `now`, truncated toward zero. Negative for future dates.
pub fn day_difference(date: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - date).num_milliseconds() / DAY_MILLIS
}

/// Labels `date` relative to `now`:
///
/// | day difference | label               |
/// |----------------|---------------------|
/// | 0 or less      | `Today`             |
/// | 1              | `1 day ago`         |
/// | 2 to 7         | `N days ago`        |
/// | more than 7    | `absolute_date`     |
///
/// Dates slightly in the future, e.g. from clock skew between devices, read as `Today`. Text
/// that is not a timestamp is returned as is.
pub fn format_relative_date(date: &str, now: DateTime<Utc>) -> String {
    let Some(timestamp) = parse_timestamp(date) else {
        return date.to_string();
    };
    match day_difference(timestamp, now) {
        d if d <= 0 => "Today".to_string(),
        1 => "1 day ago".to_string(),
        d @ 2..=7 => format!("{d} days ago"),
        _ => absolute_date(timestamp),
    }
}

/// The calendar date in the local time zone, written the Indonesian way: `D/M/YYYY`.
pub fn absolute_date(timestamp: DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%-d/%-m/%Y")
        .to_string()
}
