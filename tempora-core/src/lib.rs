//! Tempora Core - Fundamental types
//!
//! This crate provides the leaf types used throughout Tempora:
//! - `validate`: calendar field range checks and the leap-year rule
//! - `calendar`: proleptic Gregorian epoch-day math and month carry
//! - `Duration`: flat day/hour/minute/second/millisecond magnitudes
//! - `UtcOffset`: the fixed offset standing in for the default zone
//! - `Error`: structured errors, including `RangeError`

pub mod calendar;
pub mod validate;
mod duration;
mod error;
mod offset;

pub use duration::Duration;
pub use error::{Error, Field, RangeError, Result};
pub use offset::UtcOffset;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Duration, Error, Field, RangeError, UtcOffset};
}
