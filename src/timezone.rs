//! Helpers for working with the configured local timezone.

use time::{Date, OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

/// Look up the UTC offset for `canonical_timezone` at the current instant.
///
/// Returns [None] when `canonical_timezone` is not a known timezone name.
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// Get today's date in `canonical_timezone`, falling back to UTC when the
/// timezone name is unknown.
pub fn local_date_today(canonical_timezone: &str) -> Date {
    let now = OffsetDateTime::now_utc();

    match get_local_offset(canonical_timezone) {
        Some(offset) => now.to_offset(offset).date(),
        None => {
            tracing::warn!("Unknown timezone {canonical_timezone}, falling back to UTC.");
            now.date()
        }
    }
}

/// Get the current date and time in `canonical_timezone`, falling back to UTC
/// when the timezone name is unknown.
pub fn local_now(canonical_timezone: &str) -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();

    match get_local_offset(canonical_timezone) {
        Some(offset) => now.to_offset(offset),
        None => now,
    }
}

#[cfg(test)]
mod timezone_tests {
    use super::{get_local_offset, local_date_today, local_now};

    #[test]
    fn known_timezone_returns_offset() {
        let offset = get_local_offset("Asia/Manila");

        assert!(offset.is_some());
        assert_eq!(offset.unwrap().whole_hours(), 8);
    }

    #[test]
    fn unknown_timezone_returns_none() {
        assert!(get_local_offset("Not/AZone").is_none());
    }

    #[test]
    fn unknown_timezone_falls_back_to_utc() {
        let got = local_now("Not/AZone");

        assert!(got.offset().is_utc());
    }

    #[test]
    fn local_date_matches_local_now() {
        let date = local_date_today("Asia/Manila");
        let now = local_now("Asia/Manila");

        assert_eq!(date, now.date());
    }
}
