//! Presentation helpers shared by the display transforms.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Subject name shown when a video has none
pub const DEFAULT_SUBJECT: &str = "General";

/// Author name shown when a video has none
pub const DEFAULT_AUTHOR: &str = "Teacher";

/// Name shown for a comment without author details
pub const DEFAULT_USER: &str = "User";

/// Placeholder thumbnail for a video without one
pub fn default_thumbnail(video_id: i64) -> String {
    format!("https://picsum.photos/id/{video_id}/300/200")
}

/// Generated avatar for a user without one
pub fn avatar_url(user_id: i64) -> String {
    format!("https://picsum.photos/seed/user{user_id}/40/40")
}

/// Parse a backend timestamp.
///
/// Accepts RFC 3339 and the naive `YYYY-MM-DDTHH:MM:SS[.fff]` form, which
/// is taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

/// Human-readable age of `then` as seen at `now`
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds().max(0);
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    let plural = |n: i64, unit: &str| {
        if n == 1 {
            format!("1 {unit} ago")
        } else {
            format!("{n} {unit}s ago")
        }
    };

    if days > 0 {
        plural(days, "day")
    } else if hours > 0 {
        plural(hours, "hour")
    } else if minutes > 0 {
        plural(minutes, "minute")
    } else {
        "just now".to_string()
    }
}

/// Relative age of a raw backend timestamp; empty when unparseable
pub fn relative_time_from(raw: &str, now: DateTime<Utc>) -> String {
    parse_timestamp(raw)
        .map(|then| relative_time(then, now))
        .unwrap_or_default()
}

/// `value` unless it is missing or blank
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Full name from optional first and last names
pub(crate) fn full_name(first: Option<&str>, last: Option<&str>) -> Option<String> {
    match (non_blank(first), non_blank(last)) {
        (Some(first), Some(last)) => Some(format!("{first} {last}")),
        (Some(first), None) => Some(first.to_string()),
        _ => None,
    }
}
