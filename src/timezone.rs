//! Helpers for working out the current date in the configured timezone.

use time::{Date, OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

/// Get the current UTC offset of `canonical_timezone`, e.g. "Pacific/Auckland".
///
/// Returns `None` if the timezone name is not recognised.
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// Today's date in `canonical_timezone`.
///
/// Falls back to the UTC date and logs a warning if the timezone name is not
/// recognised.
pub fn today(canonical_timezone: &str) -> Date {
    let now = OffsetDateTime::now_utc();

    match get_local_offset(canonical_timezone) {
        Some(offset) => now.to_offset(offset).date(),
        None => {
            tracing::warn!("Unknown timezone \"{canonical_timezone}\", using UTC for today's date");
            now.date()
        }
    }
}
