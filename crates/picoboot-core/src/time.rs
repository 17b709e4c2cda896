//! Utility module for working with timestamps and getting the current time.
//!
//! Used exclusively by the CLI's logger formatter; the pipeline itself never touches the clock.

use time::OffsetDateTime;

/// Returns a formatted [`String`] with the current time.
///
/// Note that this may be the local time, or may fall back to UTC if the local offset can't be
/// determined (e.g. inside a minimal container).
#[must_use]
pub fn current_time() -> String {
    let time = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    format!(
        "{}-{:02}-{:02} {:02}:{:02}:{:02}",
        time.year(),
        time.month() as u8,
        time.day(),
        time.hour(),
        time.minute(),
        time.second()
    )
}
