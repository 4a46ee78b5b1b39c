//! Instants in time
//!
//! An [`Instant`] is a millisecond count since 1970-01-01T00:00:00Z plus the
//! offset its calendar fields are read in and the pattern it renders with.
//! Instants are values: every arithmetic method returns a new instant.
//!
//! Equality, ordering and hashing look at the millisecond count only, so two
//! instants with different patterns or offsets can still be equal.

use crate::civil::DateTime;
use crate::config::Config;
use crate::pattern::Pattern;
use crate::rollover;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::time::{SystemTime, UNIX_EPOCH};
use tempora_core::calendar::{
    MILLIS_PER_SECOND, SECONDS_PER_DAY, SECONDS_PER_HOUR, SECONDS_PER_MINUTE,
};
use tempora_core::{validate, Duration, Error, Result, UtcOffset};

/// Digit count of a unix timestamp in seconds
const UNIX_SECONDS_DIGITS: u32 = 10;
/// Digit count of a unix timestamp in milliseconds
const UNIX_MILLIS_DIGITS: u32 = 13;

/// An absolute point in time with millisecond resolution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instant {
    /// Milliseconds since Unix epoch (negative for pre-1970 instants)
    millis: i64,
    /// Offset used to read calendar fields
    offset: UtcOffset,
    /// Output pattern for `Display`
    pattern: Pattern,
}

impl Instant {
    // ========== Construction ==========

    fn with_config(millis: i64, config: Config) -> Self {
        Self { millis, offset: config.offset, pattern: config.pattern }
    }

    /// The current wall-clock time
    pub fn now() -> Self {
        Self::from_system_time(SystemTime::now())
    }

    /// Wrap a host timestamp; the default offset and pattern come from the
    /// environment
    pub fn from_system_time(time: SystemTime) -> Self {
        let millis = match time.duration_since(UNIX_EPOCH) {
            Ok(after) => i64::try_from(after.as_millis()).unwrap_or(i64::MAX),
            Err(before) => {
                let before = before.duration();
                // round toward negative infinity so sub-millisecond
                // remainders stay inside the earlier millisecond
                let whole = i64::try_from(before.as_millis()).unwrap_or(i64::MAX);
                let partial = before.subsec_nanos() % 1_000_000 != 0;
                -whole - i64::from(partial)
            }
        };
        Self::with_config(millis, Config::from_env())
    }

    /// Create from milliseconds since Unix epoch
    pub fn from_millis(millis: i64) -> Self {
        Self::with_config(millis, Config::from_env())
    }

    /// Create from seconds since Unix epoch
    pub fn from_unix_seconds(seconds: i64) -> Self {
        Self::from_millis(seconds.saturating_mul(MILLIS_PER_SECOND))
    }

    /// Create from a unix timestamp given either in seconds or milliseconds
    ///
    /// A value with 10 decimal digits is read as seconds and one with 13
    /// digits as milliseconds. Anything else, including negative values,
    /// is rejected with [`Error::AmbiguousTimestamp`].
    pub fn from_timestamp(value: i64) -> Result<Self> {
        let digits = value.unsigned_abs().checked_ilog10().map_or(1, |d| d + 1);
        match digits {
            UNIX_SECONDS_DIGITS if value > 0 => Ok(Self::from_unix_seconds(value)),
            UNIX_MILLIS_DIGITS if value > 0 => Ok(Self::from_millis(value)),
            _ => {
                tracing::debug!(value, digits, "rejected timestamp");
                Err(Error::AmbiguousTimestamp { value, digits })
            }
        }
    }

    /// Local midnight of a calendar date
    pub fn from_date(year: i32, month: i32, date: i32) -> Result<Self> {
        Self::from_fields_millis(year, month, date, 0, 0, 0, 0)
    }

    /// Midnight of a calendar date in `offset`
    pub fn from_date_in(year: i32, month: i32, date: i32, offset: UtcOffset) -> Result<Self> {
        Self::from_fields_in(year, month, date, 0, 0, 0, 0, offset)
    }

    /// A local calendar moment to the second
    pub fn from_fields(
        year: i32,
        month: i32,
        date: i32,
        hour: i32,
        minute: i32,
        second: i32,
    ) -> Result<Self> {
        Self::from_fields_millis(year, month, date, hour, minute, second, 0)
    }

    /// A local calendar moment to the millisecond
    pub fn from_fields_millis(
        year: i32,
        month: i32,
        date: i32,
        hour: i32,
        minute: i32,
        second: i32,
        millisecond: i32,
    ) -> Result<Self> {
        let config = Config::from_env();
        let instant = Self::from_fields_in(
            year, month, date, hour, minute, second, millisecond, config.offset,
        )?;
        Ok(instant.with_pattern(config.pattern))
    }

    /// A calendar moment in `offset`, every field validated
    #[allow(clippy::too_many_arguments)]
    pub fn from_fields_in(
        year: i32,
        month: i32,
        date: i32,
        hour: i32,
        minute: i32,
        second: i32,
        millisecond: i32,
        offset: UtcOffset,
    ) -> Result<Self> {
        validate::check(year, month, date, hour, minute, second, millisecond)?;
        // validated above, so the casts cannot wrap
        let dt = DateTime {
            year,
            month: month as u32,
            day: date as u32,
            hour: hour as u32,
            minute: minute as u32,
            second: second as u32,
            millisecond: millisecond as u32,
        };
        Ok(Self::from_datetime(dt, offset))
    }

    /// Wrap civil fields read in `offset`
    ///
    /// The fields are not validated; out-of-range values carry into the
    /// next larger unit the way a lenient calendar does.
    pub fn from_datetime(dt: DateTime, offset: UtcOffset) -> Self {
        let millis = dt.to_local_millis().saturating_sub(offset.millis());
        Self { millis, offset, pattern: Pattern::default() }
    }

    /// Parse `text` laid out as `pattern`, reading it in the default offset
    pub fn parse(text: &str, pattern: &str) -> Result<Self> {
        Self::parse_in(text, pattern, Config::from_env().offset)
    }

    /// Parse `text` laid out as `pattern`
    ///
    /// An offset written in the text (`Z` letter) wins over `offset`. The
    /// parsed instant keeps `pattern` as its output pattern.
    pub fn parse_in(text: &str, pattern: &str, offset: UtcOffset) -> Result<Self> {
        let pattern = Pattern::new(pattern)?;
        let p = pattern.parse(text)?;
        let offset = p.offset.unwrap_or(offset);
        let instant = Self::from_fields_in(
            p.year, p.month, p.day, p.hour, p.minute, p.second, p.millisecond, offset,
        )?;
        Ok(instant.with_pattern(pattern))
    }

    // ========== Builders ==========

    pub fn with_pattern(mut self, pattern: Pattern) -> Self {
        self.pattern = pattern;
        self
    }

    pub fn with_offset(mut self, offset: UtcOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_timestamp(mut self, millis: i64) -> Self {
        self.millis = millis;
        self
    }

    // ========== Accessors ==========

    /// Milliseconds since Unix epoch
    pub fn timestamp(&self) -> i64 {
        self.millis
    }

    /// Seconds since Unix epoch, truncated toward zero
    pub fn unix_seconds(&self) -> i64 {
        self.millis / MILLIS_PER_SECOND
    }

    pub fn offset(&self) -> UtcOffset {
        self.offset
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Calendar fields in this instant's offset
    pub fn datetime(&self) -> DateTime {
        DateTime::from_local_millis(self.millis.saturating_add(self.offset.millis()))
    }

    pub fn year(&self) -> i32 {
        self.datetime().year
    }

    pub fn month(&self) -> u32 {
        self.datetime().month
    }

    pub fn day(&self) -> u32 {
        self.datetime().day
    }

    pub fn hour(&self) -> u32 {
        self.datetime().hour
    }

    pub fn minute(&self) -> u32 {
        self.datetime().minute
    }

    pub fn second(&self) -> u32 {
        self.datetime().second
    }

    pub fn millisecond(&self) -> u32 {
        self.datetime().millisecond
    }

    /// Day of week (1=Monday, 7=Sunday)
    pub fn weekday(&self) -> u32 {
        self.datetime().weekday()
    }

    pub fn day_of_year(&self) -> u32 {
        self.datetime().day_of_year()
    }

    /// Whether the local year of this instant is a leap year
    pub fn is_leap_year(&self) -> bool {
        validate::is_leap_year(self.year())
    }

    // ========== Arithmetic ==========

    fn shifted(&self, millis: i64) -> Self {
        Self { millis, offset: self.offset, pattern: self.pattern.clone() }
    }

    /// Add a duration field by field: days, hours, minutes, seconds,
    /// milliseconds
    pub fn add(&self, duration: &Duration) -> Self {
        self.shifted(rollover::add_duration(self.millis, self.offset, duration))
    }

    /// Subtract a duration, i.e. add it with every field negated
    pub fn minus(&self, duration: &Duration) -> Self {
        self.add(&duration.negate())
    }

    /// Elapsed time from `earlier` to `self`
    ///
    /// The difference is split with fixed unit sizes (86400 s per day), not
    /// calendar months, and its sign carries into every field.
    pub fn since(&self, earlier: &Instant) -> Duration {
        Duration::from_millis(self.millis.saturating_sub(earlier.millis))
    }

    /// Add days; fractions are truncated to whole seconds
    pub fn add_days(&self, days: f64) -> Self {
        self.add_seconds(rollover::whole_seconds(days, SECONDS_PER_DAY))
    }

    /// Add hours; fractions are truncated to whole seconds
    pub fn add_hours(&self, hours: f64) -> Self {
        self.add_seconds(rollover::whole_seconds(hours, SECONDS_PER_HOUR))
    }

    /// Add minutes; fractions are truncated to whole seconds
    pub fn add_minutes(&self, minutes: f64) -> Self {
        self.add_seconds(rollover::whole_seconds(minutes, SECONDS_PER_MINUTE))
    }

    pub fn add_seconds(&self, seconds: i64) -> Self {
        let delta = seconds.saturating_mul(MILLIS_PER_SECOND);
        self.shifted(rollover::add_millis(self.millis, delta))
    }

    pub fn add_milliseconds(&self, milliseconds: i64) -> Self {
        self.shifted(rollover::add_millis(self.millis, milliseconds))
    }

    /// Add months; the day of month is clamped to the target month
    pub fn add_months(&self, months: i32) -> Self {
        self.shifted(rollover::add_months(self.millis, self.offset, months as i64))
    }

    /// Add years; February 29 becomes February 28 in common years
    pub fn add_years(&self, years: i32) -> Self {
        self.shifted(rollover::add_months(self.millis, self.offset, years as i64 * 12))
    }

    // ========== Comparison & Formatting ==========

    /// -1, 0 or 1 as `self` is before, equal to or after `other`
    pub fn compare_to(&self, other: &Instant) -> i32 {
        self.cmp(other) as i32
    }

    /// Render with this instant's pattern
    pub fn to_text(&self) -> String {
        self.pattern.format(&self.datetime(), self.offset)
    }

    /// Render with an ad-hoc pattern
    pub fn format(&self, pattern: &str) -> Result<String> {
        let pattern = Pattern::new(pattern)?;
        Ok(pattern.format(&self.datetime(), self.offset))
    }
}

impl Default for Instant {
    fn default() -> Self {
        Self::now()
    }
}

impl From<SystemTime> for Instant {
    fn from(time: SystemTime) -> Self {
        Self::from_system_time(time)
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl PartialEq for Instant {
    fn eq(&self, other: &Self) -> bool {
        self.millis == other.millis
    }
}

impl Eq for Instant {}

impl Hash for Instant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.millis.hash(state);
    }
}

impl PartialOrd for Instant {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Instant {
    fn cmp(&self, other: &Self) -> Ordering {
        self.millis.cmp(&other.millis)
    }
}

// Operators take `&Instant`: a by-value `Add` impl would shadow the
// inherent `add` in method calls on owned instants.
impl Add<Duration> for &Instant {
    type Output = Instant;

    fn add(self, duration: Duration) -> Instant {
        Instant::add(self, &duration)
    }
}

impl Sub<Duration> for &Instant {
    type Output = Instant;

    fn sub(self, duration: Duration) -> Instant {
        self.minus(&duration)
    }
}

impl AddAssign<Duration> for Instant {
    fn add_assign(&mut self, duration: Duration) {
        self.millis = rollover::add_duration(self.millis, self.offset, &duration);
    }
}

impl SubAssign<Duration> for Instant {
    fn sub_assign(&mut self, duration: Duration) {
        *self += duration.negate();
    }
}

impl Sub<&Instant> for &Instant {
    type Output = Duration;

    fn sub(self, earlier: &Instant) -> Duration {
        self.since(earlier)
    }
}
