//! Calendar rollover
//!
//! Applies field deltas to a UTC millisecond count in a given offset. Day
//! and month deltas move the local civil date and keep the local time of
//! day; month deltas clamp the day of month to the target month. Sub-day
//! deltas are fixed-length. All results saturate at the `i64` bounds.

use tempora_core::calendar;
use tempora_core::{Duration, UtcOffset};

fn to_local(millis: i64, offset: UtcOffset) -> i64 {
    millis.saturating_add(offset.millis())
}

fn to_utc(local: i64, offset: UtcOffset) -> i64 {
    local.saturating_sub(offset.millis())
}

/// Move by whole days, carrying across month and year ends
pub(crate) fn add_days(millis: i64, offset: UtcOffset, days: i64) -> i64 {
    let (day, time) = calendar::split_millis(to_local(millis, offset));
    to_utc(calendar::join_millis(day.saturating_add(days), time), offset)
}

/// Move by whole months, carrying into the year and clamping the day
pub(crate) fn add_months(millis: i64, offset: UtcOffset, months: i64) -> i64 {
    let (day, time) = calendar::split_millis(to_local(millis, offset));
    let (year, month, date) = calendar::civil_from_days(day);
    let (year, month, date) = calendar::add_months(year, month, date, months);
    let day = calendar::days_from_civil(year, month, date);
    to_utc(calendar::join_millis(day, time), offset)
}

/// Move by a fixed number of milliseconds
pub(crate) fn add_millis(millis: i64, delta: i64) -> i64 {
    millis.saturating_add(delta)
}

/// Apply every field of `duration` in order: days, hours, minutes,
/// seconds, milliseconds
pub(crate) fn add_duration(millis: i64, offset: UtcOffset, duration: &Duration) -> i64 {
    let millis = add_days(millis, offset, duration.days());
    let [_, hours, minutes, seconds, milliseconds] = duration.field_millis();
    [hours, minutes, seconds, milliseconds]
        .into_iter()
        .fold(millis, add_millis)
}

/// Convert a fractional amount of some unit to whole seconds, truncating
/// toward zero; NaN becomes zero and infinities saturate
pub(crate) fn whole_seconds(amount: f64, seconds_per_unit: i64) -> i64 {
    (amount * seconds_per_unit as f64) as i64
}
