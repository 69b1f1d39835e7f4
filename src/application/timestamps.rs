//! Browser timestamp conversion.
//!
//! Chromium counts microseconds from 1601-01-01 (the Windows FILETIME epoch),
//! Firefox counts microseconds from the Unix epoch. Both become ISO-8601 UTC
//! strings; zero means "unknown" in both formats.

use chrono::{DateTime, SecondsFormat, Utc};

/// Microseconds between 1601-01-01 and 1970-01-01.
const WINDOWS_TO_UNIX_EPOCH_MICROS: i64 = 11_644_473_600_000_000;

/// Converts a Chromium timestamp string to ISO-8601.
pub fn chromium_time_to_iso(raw: Option<&str>) -> Option<String> {
    let micros = raw?.trim().parse::<i64>().ok().filter(|v| *v > 0)?;
    unix_micros_to_iso(micros.checked_sub(WINDOWS_TO_UNIX_EPOCH_MICROS)?)
}

/// Converts a Firefox PRTime value to ISO-8601.
pub fn firefox_time_to_iso(raw: Option<i64>) -> Option<String> {
    let micros = raw.filter(|v| *v > 0)?;
    unix_micros_to_iso(micros)
}

fn unix_micros_to_iso(micros: i64) -> Option<String> {
    let dt: DateTime<Utc> = DateTime::from_timestamp_micros(micros)?;
    Some(dt.to_rfc3339_opts(SecondsFormat::Micros, true))
}
