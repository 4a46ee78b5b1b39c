//! Errors for calendar validation, timestamps, patterns and parsing
//!
//! Every fallible operation in the workspace returns [`Error`]. Range
//! violations carry a structured [`RangeError`] so callers can tell which
//! calendar field was rejected.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result alias used across tempora
pub type Result<T> = std::result::Result<T, Error>;

/// A calendar field that can be range checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Year,
    Month,
    Date,
    Hour,
    Minute,
    Second,
    Millisecond,
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Field::Year => "year",
            Field::Month => "month",
            Field::Date => "date",
            Field::Hour => "hour",
            Field::Minute => "minute",
            Field::Second => "second",
            Field::Millisecond => "millisecond",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A calendar field value outside of its valid range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("the {field}: {value} is out of range of ({min} ~ {max})")]
pub struct RangeError {
    pub field: Field,
    pub value: i64,
    pub min: i64,
    pub max: i64,
}

impl RangeError {
    pub fn new(field: Field, value: i64, min: i64, max: i64) -> Self {
        Self { field, value, min, max }
    }
}

/// Error type for tempora operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Range(#[from] RangeError),

    #[error("timestamp {value} has {digits} digits, expected 10 (seconds) or 13 (milliseconds)")]
    AmbiguousTimestamp { value: i64, digits: u32 },

    #[error("invalid pattern '{pattern}': {reason}")]
    Pattern { pattern: String, reason: String },

    #[error("cannot parse '{input}' at position {position}: {reason}")]
    Parse {
        input: String,
        position: usize,
        reason: String,
    },

    #[error("invalid UTC offset: {0}")]
    Offset(String),

    #[error("invalid duration: {0}")]
    Duration(String),
}

impl Error {
    pub fn pattern(pattern: &str, reason: impl Into<String>) -> Self {
        Self::Pattern {
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }

    pub fn parse(input: &str, position: usize, reason: impl Into<String>) -> Self {
        Self::Parse {
            input: input.to_string(),
            position,
            reason: reason.into(),
        }
    }

    /// The range violation behind this error, if any
    pub fn as_range(&self) -> Option<&RangeError> {
        match self {
            Error::Range(e) => Some(e),
            _ => None,
        }
    }
}
