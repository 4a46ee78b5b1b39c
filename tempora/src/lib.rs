//! Tempora - calendar-aware instants and durations
//!
//! ```
//! use tempora::prelude::*;
//!
//! let start = Instant::from_fields_in(2024, 1, 31, 9, 0, 0, 0, UtcOffset::UTC)?;
//! assert_eq!(start.add_months(1).to_text(), "2024-02-29 09:00:00");
//!
//! let end = start.add(&Duration::new(1, 1, 1, 1, 1));
//! assert_eq!(end.since(&start).to_string(), "1.01:01:01.001");
//! # Ok::<(), tempora::Error>(())
//! ```

mod civil;
mod instant;
mod rollover;
pub mod config;
pub mod pattern;

pub use civil::DateTime;
pub use config::Config;
pub use instant::Instant;
pub use pattern::{Pattern, DEFAULT_PATTERN};
pub use tempora_core::{calendar, validate, Duration, Error, Field, RangeError, Result, UtcOffset};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{DateTime, Duration, Error, Instant, Pattern, UtcOffset};
}
