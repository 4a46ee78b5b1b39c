//! Flat day/hour/minute/second/millisecond durations
//!
//! A [`Duration`] is a tuple of independent fields. Nothing is carried
//! between fields unless [`Duration::normalized`] is called, so `hours = 30`
//! stays thirty hours and flows through the totals and the text form as is.

use crate::calendar::{
    MILLIS_PER_DAY, MILLIS_PER_HOUR, MILLIS_PER_MINUTE, MILLIS_PER_SECOND, SECONDS_PER_DAY,
    SECONDS_PER_HOUR, SECONDS_PER_MINUTE,
};
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Neg;
use std::str::FromStr;

/// A calendar-relative magnitude
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Duration {
    days: i64,
    hours: i32,
    minutes: i32,
    seconds: i32,
    milliseconds: i32,
}

impl Duration {
    pub const ZERO: Duration = Duration::new(0, 0, 0, 0, 0);

    /// Create from fields, no validation
    pub const fn new(days: i64, hours: i32, minutes: i32, seconds: i32, milliseconds: i32) -> Self {
        Self { days, hours, minutes, seconds, milliseconds }
    }

    /// Decompose a signed millisecond count with fixed unit sizes
    ///
    /// Division truncates toward zero, so a negative count yields fields
    /// that are all zero or negative.
    pub fn from_millis(millis: i64) -> Self {
        let milliseconds = (millis % MILLIS_PER_SECOND) as i32;
        let secs = millis / MILLIS_PER_SECOND;
        Self {
            days: secs / SECONDS_PER_DAY,
            hours: ((secs % SECONDS_PER_DAY) / SECONDS_PER_HOUR) as i32,
            minutes: ((secs % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE) as i32,
            seconds: (secs % SECONDS_PER_MINUTE) as i32,
            milliseconds,
        }
    }

    pub fn from_days(days: i64) -> Self {
        Self { days, ..Self::ZERO }
    }

    pub fn from_hours(hours: i32) -> Self {
        Self { hours, ..Self::ZERO }
    }

    pub fn from_minutes(minutes: i32) -> Self {
        Self { minutes, ..Self::ZERO }
    }

    pub fn from_seconds(seconds: i32) -> Self {
        Self { seconds, ..Self::ZERO }
    }

    // ========== Accessors ==========

    pub fn days(&self) -> i64 {
        self.days
    }

    pub fn hours(&self) -> i32 {
        self.hours
    }

    pub fn minutes(&self) -> i32 {
        self.minutes
    }

    pub fn seconds(&self) -> i32 {
        self.seconds
    }

    pub fn milliseconds(&self) -> i32 {
        self.milliseconds
    }

    // ========== Totals ==========

    /// Whole seconds in this duration, milliseconds excluded; saturates
    /// at the `i64` bounds
    pub fn total_seconds(&self) -> i64 {
        self.days
            .saturating_mul(SECONDS_PER_DAY)
            .saturating_add(self.hours as i64 * SECONDS_PER_HOUR)
            .saturating_add(self.minutes as i64 * SECONDS_PER_MINUTE)
            .saturating_add(self.seconds as i64)
    }

    pub fn total_milliseconds(&self) -> i64 {
        self.total_seconds()
            .saturating_mul(MILLIS_PER_SECOND)
            .saturating_add(self.milliseconds as i64)
    }

    /// Fractional hours, from whole seconds only
    pub fn total_hours(&self) -> f64 {
        self.total_seconds() as f64 / SECONDS_PER_HOUR as f64
    }

    // ========== Utilities ==========

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Every field negated, saturating at the bounds
    pub fn negate(&self) -> Self {
        Self {
            days: self.days.saturating_neg(),
            hours: self.hours.saturating_neg(),
            minutes: self.minutes.saturating_neg(),
            seconds: self.seconds.saturating_neg(),
            milliseconds: self.milliseconds.saturating_neg(),
        }
    }

    /// Carry every field into its conventional range
    ///
    /// Equivalent to `Duration::from_millis(self.total_milliseconds())`:
    /// `Duration::new(0, 30, 0, 0, 0)` becomes one day and six hours.
    pub fn normalized(&self) -> Self {
        Self::from_millis(self.total_milliseconds())
    }

    /// Fields as millisecond offsets in application order
    /// (days, hours, minutes, seconds, milliseconds)
    pub fn field_millis(&self) -> [i64; 5] {
        [
            self.days.saturating_mul(MILLIS_PER_DAY),
            self.hours as i64 * MILLIS_PER_HOUR,
            self.minutes as i64 * MILLIS_PER_MINUTE,
            self.seconds as i64 * MILLIS_PER_SECOND,
            self.milliseconds as i64,
        ]
    }
}

impl Neg for Duration {
    type Output = Duration;

    fn neg(self) -> Duration {
        self.negate()
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:02}:{:02}:{:02}.{:03}",
            self.days, self.hours, self.minutes, self.seconds, self.milliseconds
        )
    }
}

impl FromStr for Duration {
    type Err = Error;

    /// Parse the `D.HH:MM:SS.mmm` text form produced by `Display`
    fn from_str(s: &str) -> Result<Self, Error> {
        let s = s.trim();
        let invalid = || Error::Duration(format!("expected D.HH:MM:SS.mmm, got '{}'", s));

        let (days, rest) = s.split_once('.').ok_or_else(invalid)?;
        let (clock, millis) = rest.rsplit_once('.').ok_or_else(invalid)?;
        let parts: Vec<&str> = clock.split(':').collect();
        if parts.len() != 3 {
            return Err(invalid());
        }

        let days: i64 = days.parse().map_err(|_| invalid())?;
        let hours: i32 = parts[0].parse().map_err(|_| invalid())?;
        let minutes: i32 = parts[1].parse().map_err(|_| invalid())?;
        let seconds: i32 = parts[2].parse().map_err(|_| invalid())?;
        let milliseconds: i32 = millis.parse().map_err(|_| invalid())?;

        Ok(Self::new(days, hours, minutes, seconds, milliseconds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals() {
        let d = Duration::new(1, 2, 3, 4, 5);
        assert_eq!(d.total_seconds(), 93_784);
        assert_eq!(d.total_milliseconds(), 93_784_005);
        assert!((d.total_hours() - 93_784.0 / 3600.0).abs() < 1e-12);
    }

    #[test]
    fn test_totals_saturate() {
        assert_eq!(Duration::from_days(i64::MAX).total_seconds(), i64::MAX);
        assert_eq!(Duration::from_days(i64::MIN).total_milliseconds(), i64::MIN);
    }

    #[test]
    fn test_unnormalized_fields_flow_through() {
        let d = Duration::new(0, 30, 0, 0, 0);
        assert_eq!(d.hours(), 30);
        assert_eq!(d.total_seconds(), 108_000);
        assert_eq!(d.to_string(), "0.30:00:00.000");
        assert_eq!(d.normalized(), Duration::new(1, 6, 0, 0, 0));
    }

    #[test]
    fn test_display() {
        assert_eq!(Duration::new(1, 2, 3, 4, 5).to_string(), "1.02:03:04.005");
        assert_eq!(Duration::ZERO.to_string(), "0.00:00:00.000");
        assert_eq!(Duration::new(-1, -1, -1, -1, -1).to_string(), "-1.-1:-1:-1.-01");
    }

    #[test]
    fn test_from_millis() {
        assert_eq!(Duration::from_millis(90_061_001), Duration::new(1, 1, 1, 1, 1));
        assert_eq!(Duration::from_millis(-90_061_001), Duration::new(-1, -1, -1, -1, -1));
        assert_eq!(Duration::from_millis(999), Duration::new(0, 0, 0, 0, 999));
        assert!(Duration::from_millis(0).is_zero());
    }

    #[test]
    fn test_negate() {
        let d = Duration::new(1, 2, 3, 4, 5);
        assert_eq!(-d, Duration::new(-1, -2, -3, -4, -5));
        assert_eq!(d.negate().negate(), d);
    }

    #[test]
    fn test_equality_is_componentwise() {
        // same total, different fields
        assert_ne!(Duration::new(1, 0, 0, 0, 0), Duration::new(0, 24, 0, 0, 0));
        assert_eq!(Duration::from_days(2), Duration::new(2, 0, 0, 0, 0));
    }

    #[test]
    fn test_parse() {
        let d: Duration = "1.02:03:04.005".parse().unwrap();
        assert_eq!(d, Duration::new(1, 2, 3, 4, 5));
        let d: Duration = "-3.00:00:00.000".parse().unwrap();
        assert_eq!(d.days(), -3);
        let d: Duration = "-1.-1:-1:-1.-01".parse().unwrap();
        assert_eq!(d, Duration::new(-1, -1, -1, -1, -1));
        assert!("1:02:03".parse::<Duration>().is_err());
        assert!("x.00:00:00.000".parse::<Duration>().is_err());
    }

    #[test]
    fn test_serde() {
        let d = Duration::new(1, 2, 3, 4, 5);
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, r#"{"days":1,"hours":2,"minutes":3,"seconds":4,"milliseconds":5}"#);
        let back: Duration = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
    }
}
