//! Civil date-time records
//!
//! A [`DateTime`] is the broken-down wall-clock view of an instant in some
//! offset. It carries no zone of its own.

use serde::{Deserialize, Serialize};
use std::fmt;
use tempora_core::calendar::{
    self, MILLIS_PER_HOUR, MILLIS_PER_MINUTE, MILLIS_PER_SECOND,
};
use tempora_core::{validate, Result};

/// Decomposed calendar fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateTime {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub millisecond: u32,
}

impl DateTime {
    /// Create a validated record
    pub fn new(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        millisecond: u32,
    ) -> Result<Self> {
        validate::check(
            year,
            saturate(month),
            saturate(day),
            saturate(hour),
            saturate(minute),
            saturate(second),
            saturate(millisecond),
        )?;
        Ok(Self { year, month, day, hour, minute, second, millisecond })
    }

    /// Break a local millisecond count into fields
    pub(crate) fn from_local_millis(local: i64) -> Self {
        let (days, ms) = calendar::split_millis(local);
        let (year, month, day) = calendar::civil_from_days(days);
        Self {
            year: year as i32,
            month,
            day,
            hour: (ms / MILLIS_PER_HOUR) as u32,
            minute: ((ms % MILLIS_PER_HOUR) / MILLIS_PER_MINUTE) as u32,
            second: ((ms % MILLIS_PER_MINUTE) / MILLIS_PER_SECOND) as u32,
            millisecond: (ms % MILLIS_PER_SECOND) as u32,
        }
    }

    /// Local millisecond count for these fields
    ///
    /// Fields are not validated: overflowing values carry into the next
    /// larger unit, so month 13 is January of the following year and
    /// hour 24 is midnight of the next day.
    pub(crate) fn to_local_millis(&self) -> i64 {
        let (year, month, _) =
            calendar::add_months(self.year as i64, 1, 1, self.month as i64 - 1);
        let days = calendar::days_from_civil(year, month, 1) + self.day as i64 - 1;
        let time = self.hour as i64 * MILLIS_PER_HOUR
            + self.minute as i64 * MILLIS_PER_MINUTE
            + self.second as i64 * MILLIS_PER_SECOND
            + self.millisecond as i64;
        calendar::join_millis(days, 0).saturating_add(time)
    }

    fn epoch_day(&self) -> i64 {
        calendar::days_from_civil(self.year as i64, self.month, self.day)
    }

    /// Day of week (1=Monday, 7=Sunday)
    pub fn weekday(&self) -> u32 {
        calendar::weekday(self.epoch_day())
    }

    /// Day of year (1-366)
    pub fn day_of_year(&self) -> u32 {
        calendar::day_of_year(self.year as i64, self.month, self.day)
    }

    pub fn is_leap_year(&self) -> bool {
        validate::is_leap_year(self.year)
    }
}

fn saturate(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}",
            self.year, self.month, self.day, self.hour, self.minute, self.second, self.millisecond
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempora_core::Field;

    #[test]
    fn test_new_validates() {
        assert!(DateTime::new(2024, 2, 29, 23, 59, 59, 999).is_ok());
        let err = DateTime::new(2023, 2, 29, 0, 0, 0, 0).unwrap_err();
        assert_eq!(err.as_range().map(|e| e.field), Some(Field::Date));
        let err = DateTime::new(2023, 1, 1, 0, 0, 0, u32::MAX).unwrap_err();
        assert_eq!(err.as_range().map(|e| e.field), Some(Field::Millisecond));
    }

    #[test]
    fn test_local_millis_roundtrip() {
        let dt = DateTime::new(1969, 12, 31, 23, 59, 59, 999).unwrap();
        assert_eq!(dt.to_local_millis(), -1);
        assert_eq!(DateTime::from_local_millis(-1), dt);
    }

    #[test]
    fn test_lenient_carry() {
        let dt = DateTime { year: 2023, month: 13, day: 1, hour: 0, minute: 0, second: 0, millisecond: 0 };
        let jan = DateTime::new(2024, 1, 1, 0, 0, 0, 0).unwrap();
        assert_eq!(dt.to_local_millis(), jan.to_local_millis());

        let dt = DateTime { year: 2023, month: 2, day: 29, hour: 24, minute: 0, second: 0, millisecond: 0 };
        let mar = DateTime::new(2023, 3, 2, 0, 0, 0, 0).unwrap();
        assert_eq!(dt.to_local_millis(), mar.to_local_millis());
    }

    #[test]
    fn test_weekday_and_day_of_year() {
        let dt = DateTime::new(2025, 6, 15, 0, 0, 0, 0).unwrap();
        assert_eq!(dt.weekday(), 7);
        assert_eq!(dt.day_of_year(), 166);
        assert!(!dt.is_leap_year());
    }

    #[test]
    fn test_display() {
        let dt = DateTime::new(2025, 6, 5, 4, 3, 2, 1).unwrap();
        assert_eq!(dt.to_string(), "2025-06-05T04:03:02.001");
    }
}
