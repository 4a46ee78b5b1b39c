//! Fixed UTC offsets
//!
//! The default zone of an instant is a fixed offset east of UTC. Offsets are
//! written `Z`, `UTC`, `+HH`, `+HHMM`, `+HH:MM` or `+HH:MM:SS`.

use crate::calendar::{MILLIS_PER_SECOND, SECONDS_PER_HOUR, SECONDS_PER_MINUTE};
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest supported offset magnitude, 25:59:59
const MAX_OFFSET_SECONDS: i32 = 25 * 3600 + 59 * 60 + 59;

/// A fixed offset from UTC in seconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct UtcOffset {
    seconds: i32,
}

impl UtcOffset {
    pub const UTC: UtcOffset = UtcOffset { seconds: 0 };

    /// Create from seconds east of UTC
    pub fn from_seconds(seconds: i32) -> Result<Self, Error> {
        if !(-MAX_OFFSET_SECONDS..=MAX_OFFSET_SECONDS).contains(&seconds) {
            return Err(Error::Offset(format!(
                "{} seconds is beyond ±25:59:59",
                seconds
            )));
        }
        Ok(Self { seconds })
    }

    /// Create from whole hours, e.g. `UtcOffset::hours(8)` for `+08:00`
    pub fn hours(hours: i8) -> Result<Self, Error> {
        Self::from_seconds(hours as i32 * SECONDS_PER_HOUR as i32)
    }

    pub fn seconds(&self) -> i32 {
        self.seconds
    }

    pub fn millis(&self) -> i64 {
        self.seconds as i64 * MILLIS_PER_SECOND
    }

    pub fn is_utc(&self) -> bool {
        self.seconds == 0
    }

    /// Compact form used by the `Z` pattern letter, e.g. `+0800`
    pub fn to_compact(&self) -> String {
        let (sign, abs) = self.sign_abs();
        format!(
            "{}{:02}{:02}",
            sign,
            abs / SECONDS_PER_HOUR as i32,
            (abs % SECONDS_PER_HOUR as i32) / SECONDS_PER_MINUTE as i32
        )
    }

    fn sign_abs(&self) -> (char, i32) {
        if self.seconds < 0 { ('-', -self.seconds) } else { ('+', self.seconds) }
    }
}

impl fmt::Display for UtcOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (sign, abs) = self.sign_abs();
        let hours = abs / SECONDS_PER_HOUR as i32;
        let minutes = (abs % SECONDS_PER_HOUR as i32) / SECONDS_PER_MINUTE as i32;
        let seconds = abs % SECONDS_PER_MINUTE as i32;
        write!(f, "{}{:02}:{:02}", sign, hours, minutes)?;
        if seconds != 0 {
            write!(f, ":{:02}", seconds)?;
        }
        Ok(())
    }
}

impl FromStr for UtcOffset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("utc") {
            return Ok(Self::UTC);
        }

        let invalid = || Error::Offset(format!("expected Z or ±HH[:MM[:SS]], got '{}'", s));
        let (sign, body) = match s.as_bytes().first() {
            Some(b'+') => (1, &s[1..]),
            Some(b'-') => (-1, &s[1..]),
            _ => return Err(invalid()),
        };

        let digits: String = body.chars().filter(|c| *c != ':').collect();
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        // the colon form must keep two-digit groups
        if body.contains(':') && body.split(':').any(|part| part.len() != 2) {
            return Err(invalid());
        }

        let group = |range: std::ops::Range<usize>| -> Result<i32, Error> {
            digits[range].parse::<i32>().map_err(|_| invalid())
        };
        let (hours, minutes, seconds) = match digits.len() {
            2 => (group(0..2)?, 0, 0),
            4 => (group(0..2)?, group(2..4)?, 0),
            6 => (group(0..2)?, group(2..4)?, group(4..6)?),
            _ => return Err(invalid()),
        };
        if minutes > 59 || seconds > 59 {
            return Err(invalid());
        }

        Self::from_seconds(sign * (hours * 3600 + minutes * 60 + seconds))
    }
}

impl TryFrom<i32> for UtcOffset {
    type Error = Error;

    fn try_from(seconds: i32) -> Result<Self, Error> {
        Self::from_seconds(seconds)
    }
}

impl From<UtcOffset> for i32 {
    fn from(offset: UtcOffset) -> i32 {
        offset.seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forms() {
        assert_eq!("Z".parse::<UtcOffset>().unwrap(), UtcOffset::UTC);
        assert_eq!("utc".parse::<UtcOffset>().unwrap(), UtcOffset::UTC);
        assert_eq!("+08".parse::<UtcOffset>().unwrap().seconds(), 8 * 3600);
        assert_eq!("+0530".parse::<UtcOffset>().unwrap().seconds(), 5 * 3600 + 30 * 60);
        assert_eq!("-05:00".parse::<UtcOffset>().unwrap().seconds(), -5 * 3600);
        assert_eq!("+01:02:03".parse::<UtcOffset>().unwrap().seconds(), 3723);
    }

    #[test]
    fn test_parse_rejects() {
        assert!("08:00".parse::<UtcOffset>().is_err());
        assert!("+8".parse::<UtcOffset>().is_err());
        assert!("+08:60".parse::<UtcOffset>().is_err());
        assert!("+26:00".parse::<UtcOffset>().is_err());
        assert!("+0a:00".parse::<UtcOffset>().is_err());
        assert!("+0:800".parse::<UtcOffset>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(UtcOffset::UTC.to_string(), "+00:00");
        assert_eq!(UtcOffset::hours(-5).unwrap().to_string(), "-05:00");
        assert_eq!(UtcOffset::from_seconds(3723).unwrap().to_string(), "+01:02:03");
        assert_eq!(UtcOffset::from_seconds(19_800).unwrap().to_compact(), "+0530");
    }

    #[test]
    fn test_serde_as_seconds() {
        let offset = UtcOffset::hours(8).unwrap();
        assert_eq!(serde_json::to_string(&offset).unwrap(), "28800");
        let back: UtcOffset = serde_json::from_str("28800").unwrap();
        assert_eq!(back, offset);
        assert!(serde_json::from_str::<UtcOffset>("999999").is_err());
    }
}
