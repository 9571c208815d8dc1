use chrono::{DateTime, Duration, SecondsFormat, Utc};

/// Formats an instant as ISO 8601 UTC with a fixed microsecond width.
///
/// The fixed width keeps lexical order equal to chronological order, so
/// `createdAt`/`updatedAt` sort correctly as plain strings.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Stamp for a write that supersedes one stamped `previous`: `now`, or one
/// microsecond past `previous` when this clock is not ahead of it.
///
/// An unparseable `previous` is ignored.
pub fn next_timestamp(previous: &str, now: DateTime<Utc>) -> String {
    let floor = DateTime::parse_from_rfc3339(previous)
        .ok()
        .map(|stamp| stamp.with_timezone(&Utc) + Duration::microseconds(1));
    match floor {
        Some(floor) if floor > now => format_timestamp(floor),
        _ => format_timestamp(now),
    }
}
