//! Proleptic Gregorian calendar arithmetic
//!
//! Conversions between civil dates and epoch days (day 0 is 1970-01-01),
//! plus month carry with day-of-month clamping. Years are `i64` here so that
//! month and year carry never overflow before the caller saturates.

pub const MILLIS_PER_SECOND: i64 = 1_000;
pub const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
pub const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
pub const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;

pub const SECONDS_PER_MINUTE: i64 = 60;
pub const SECONDS_PER_HOUR: i64 = 3_600;
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Days from 0000-03-01 to 1970-01-01
const UNIX_EPOCH_DAYS: i64 = 719_468;

/// Leap rule evaluated on the year modulo 400, safe for any `i64` year
pub fn is_leap_year(year: i64) -> bool {
    crate::validate::is_leap_year(year.rem_euclid(400) as i32)
}

/// Days in `month` of `year`, or 0 when `month` is not in 1-12
pub fn days_in_month(year: i64, month: u32) -> u32 {
    crate::validate::days_in_month(year.rem_euclid(400) as i32, month)
}

/// Convert civil date to days since Unix epoch
/// Algorithm from Howard Hinnant: http://howardhinnant.github.io/date_algorithms.html
pub fn days_from_civil(year: i64, month: u32, day: u32) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let yoe = y.rem_euclid(400); // [0, 399]
    let m = month as i64;
    let doy = (153 * (if m > 2 { m - 3 } else { m + 9 }) + 2) / 5 + day as i64 - 1; // [0, 365]
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy; // [0, 146096]
    era * 146_097 + doe - UNIX_EPOCH_DAYS
}

/// Convert days since Unix epoch to civil date
pub fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + UNIX_EPOCH_DAYS;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097); // [0, 146096]
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365; // [0, 399]
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100); // [0, 365]
    let mp = (5 * doy + 2) / 153; // [0, 11]
    let d = doy - (153 * mp + 2) / 5 + 1; // [1, 31]
    let m = if mp < 10 { mp + 3 } else { mp - 9 }; // [1, 12]
    let year = if m <= 2 { y + 1 } else { y };
    (year, m as u32, d as u32)
}

/// Day of week for an epoch day (1=Monday, 7=Sunday, ISO 8601)
pub fn weekday(days: i64) -> u32 {
    // 1970-01-01 was Thursday (4)
    ((days + 3).rem_euclid(7) + 1) as u32
}

/// Day of year (1-366)
pub fn day_of_year(year: i64, month: u32, day: u32) -> u32 {
    (days_from_civil(year, month, day) - days_from_civil(year, 1, 1) + 1) as u32
}

/// Move a civil date by `months`, carrying into the year
///
/// The day of month is clamped to the length of the target month, so
/// 2024-01-31 plus one month is 2024-02-29.
pub fn add_months(year: i64, month: u32, day: u32, months: i64) -> (i64, u32, u32) {
    let total = year
        .saturating_mul(12)
        .saturating_add(month as i64 - 1)
        .saturating_add(months);
    let new_year = total.div_euclid(12);
    let new_month = (total.rem_euclid(12) + 1) as u32;
    let new_day = day.min(days_in_month(new_year, new_month));
    (new_year, new_month, new_day)
}

/// Split a millisecond count into an epoch day and the milliseconds into it
pub fn split_millis(millis: i64) -> (i64, i64) {
    (millis.div_euclid(MILLIS_PER_DAY), millis.rem_euclid(MILLIS_PER_DAY))
}

/// Join an epoch day and a millisecond-of-day, saturating at the `i64` bounds
pub fn join_millis(days: i64, millis_of_day: i64) -> i64 {
    let total = days as i128 * MILLIS_PER_DAY as i128 + millis_of_day as i128;
    total.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}
