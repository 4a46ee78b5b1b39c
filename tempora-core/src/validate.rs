//! Calendar field validation
//!
//! Pure range checks for the fields an instant can be built from. Checks run
//! in the order month, date, hour, minute, second, millisecond and the first
//! violation is reported.

use crate::error::{Field, RangeError};

/// Days in each month of a common year
const DAYS_IN_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Check if year is a leap year
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `year`
pub fn days_in_year(year: i32) -> u32 {
    if is_leap_year(year) { 366 } else { 365 }
}

/// Get days in a month, or 0 when `month` is not in 1-12
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 if is_leap_year(year) => 29,
        1..=12 => DAYS_IN_MONTH[(month - 1) as usize],
        _ => 0,
    }
}

fn in_range(field: Field, value: i64, min: i64, max: i64) -> Result<(), RangeError> {
    if value < min || value > max {
        return Err(RangeError::new(field, value, min, max));
    }
    Ok(())
}

/// Validate the calendar fields of an instant
///
/// `month` is 1-based and `date` must fit the month of `year`, so
/// `check(2023, 2, 29, 0, 0, 0, 0)` fails while the same date in 2024 passes.
pub fn check(
    year: i32,
    month: i32,
    date: i32,
    hour: i32,
    minute: i32,
    second: i32,
    millisecond: i32,
) -> Result<(), RangeError> {
    in_range(Field::Month, month as i64, 1, 12)?;
    let max_date = days_in_month(year, month as u32) as i64;
    in_range(Field::Date, date as i64, 1, max_date)?;
    in_range(Field::Hour, hour as i64, 0, 23)?;
    in_range(Field::Minute, minute as i64, 0, 59)?;
    in_range(Field::Second, second as i64, 0, 59)?;
    in_range(Field::Millisecond, millisecond as i64, 0, 999)
}

/// Validate only a calendar date, time fields taken as midnight
pub fn check_date(year: i32, month: i32, date: i32) -> Result<(), RangeError> {
    check(year, month, date, 0, 0, 0, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leap_year() {
        assert!(is_leap_year(2000));
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2023));
        assert!(!is_leap_year(2100));
        assert!(is_leap_year(-4));
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2023, 1), 31);
        assert_eq!(days_in_month(2023, 4), 30);
        assert_eq!(days_in_month(2023, 12), 31);
        assert_eq!(days_in_month(2023, 13), 0);
        assert_eq!(days_in_year(2024), 366);
    }

    #[test]
    fn test_february() {
        assert!(check_date(2024, 2, 29).is_ok());
        let err = check_date(2023, 2, 29).unwrap_err();
        assert_eq!(err, RangeError::new(Field::Date, 29, 1, 28));
        let err = check_date(2023, 2, 30).unwrap_err();
        assert_eq!(err.field, Field::Date);
    }

    #[test]
    fn test_month_checked_first() {
        let err = check(2023, 13, 40, 99, 99, 99, 9999).unwrap_err();
        assert_eq!(err.field, Field::Month);
        let err = check(2023, 0, 1, 0, 0, 0, 0).unwrap_err();
        assert_eq!(err, RangeError::new(Field::Month, 0, 1, 12));
    }

    #[test]
    fn test_short_circuit_order() {
        assert_eq!(check(2023, 1, 32, 24, 0, 0, 0).unwrap_err().field, Field::Date);
        assert_eq!(check(2023, 1, 1, 24, 60, 0, 0).unwrap_err().field, Field::Hour);
        assert_eq!(check(2023, 1, 1, 23, 60, 60, 0).unwrap_err().field, Field::Minute);
        assert_eq!(check(2023, 1, 1, 23, 59, 60, 1000).unwrap_err().field, Field::Second);
        assert_eq!(
            check(2023, 1, 1, 23, 59, 59, 1000).unwrap_err(),
            RangeError::new(Field::Millisecond, 1000, 0, 999)
        );
        assert_eq!(check(2023, 1, 1, 0, 0, 0, -1).unwrap_err().field, Field::Millisecond);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        assert!(check(2023, 12, 31, 23, 59, 59, 999).is_ok());
        assert!(check(2023, 1, 1, 0, 0, 0, 0).is_ok());
    }
}
