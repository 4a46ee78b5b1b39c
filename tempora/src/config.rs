//! Environment configuration
//!
//! Instants built without an explicit offset or pattern take them from the
//! environment:
//!
//! - `TEMPORA_UTC_OFFSET`: default offset, e.g. `+08:00` or `Z` (UTC when unset)
//! - `TEMPORA_PATTERN`: default output pattern (`yyyy-MM-dd HH:mm:ss` when unset)
//!
//! Invalid values are logged and replaced by the defaults.

use crate::pattern::Pattern;
use std::env;
use tempora_core::UtcOffset;

pub const OFFSET_VAR: &str = "TEMPORA_UTC_OFFSET";
pub const PATTERN_VAR: &str = "TEMPORA_PATTERN";

/// Defaults applied to newly constructed instants
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub offset: UtcOffset,
    pub pattern: Pattern,
}

impl Config {
    /// Read the configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let offset = match lookup(OFFSET_VAR) {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!(var = OFFSET_VAR, value = %raw, error = %e, "ignoring invalid offset, using UTC");
                UtcOffset::UTC
            }),
            None => UtcOffset::UTC,
        };

        let pattern = match lookup(PATTERN_VAR) {
            Some(raw) => Pattern::new(&raw).unwrap_or_else(|e| {
                tracing::warn!(var = PATTERN_VAR, value = %raw, error = %e, "ignoring invalid pattern");
                Pattern::default()
            }),
            None => Pattern::default(),
        };

        tracing::trace!(offset = %offset, pattern = %pattern, "resolved config");
        Self { offset, pattern }
    }

    pub fn with_offset(mut self, offset: UtcOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_pattern(mut self, pattern: Pattern) -> Self {
        self.pattern = pattern;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::DEFAULT_PATTERN;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config, Config::default());
        assert!(config.offset.is_utc());
        assert_eq!(config.pattern.as_str(), DEFAULT_PATTERN);
    }

    #[test]
    fn test_reads_values() {
        let config = Config::from_lookup(lookup(&[
            (OFFSET_VAR, "+08:00"),
            (PATTERN_VAR, "dd/MM/yyyy"),
        ]));
        assert_eq!(config.offset, UtcOffset::hours(8).unwrap());
        assert_eq!(config.pattern.as_str(), "dd/MM/yyyy");
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = Config::from_lookup(lookup(&[
            (OFFSET_VAR, "somewhere"),
            (PATTERN_VAR, "'broken"),
        ]));
        assert_eq!(config, Config::default());
    }
}
