//! Service configuration.
//!
//! # Responsibility
//! - Hold pagination defaults applied when callers omit `limit`/`offset`.
//! - Load overrides from process environment.
//!
//! # Invariants
//! - Absent variables fall back to built-in defaults.
//! - Present but unparsable variables are reported, never silently ignored.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub const DEFAULT_LIMIT: i64 = 10;
pub const DEFAULT_OFFSET: i64 = 0;

pub const DEFAULT_LIMIT_ENV: &str = "POKEDEX_DEFAULT_LIMIT";
pub const DEFAULT_OFFSET_ENV: &str = "POKEDEX_DEFAULT_OFFSET";

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid value `{}` for `{}`; expected an integer",
            self.value, self.key
        )
    }
}

impl Error for ConfigError {}

/// Pagination defaults for `PokemonService::find_all`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PokemonConfig {
    pub default_limit: i64,
    pub default_offset: i64,
}

impl Default for PokemonConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            default_offset: DEFAULT_OFFSET,
        }
    }
}

impl PokemonConfig {
    /// Loads configuration from `POKEDEX_DEFAULT_LIMIT`/`POKEDEX_DEFAULT_OFFSET`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            default_limit: parse_int(DEFAULT_LIMIT_ENV, lookup(DEFAULT_LIMIT_ENV))?
                .unwrap_or(defaults.default_limit),
            default_offset: parse_int(DEFAULT_OFFSET_ENV, lookup(DEFAULT_OFFSET_ENV))?
                .unwrap_or(defaults.default_offset),
        })
    }
}

fn parse_int(key: &'static str, raw: Option<String>) -> Result<Option<i64>, ConfigError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<i64>()
        .map(Some)
        .map_err(|_| ConfigError { key, value: raw })
}

#[cfg(test)]
mod tests {
    use super::{PokemonConfig, DEFAULT_LIMIT_ENV, DEFAULT_OFFSET_ENV};
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_values_fall_back_to_defaults() {
        let config = PokemonConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, PokemonConfig::default());
        assert_eq!(config.default_limit, 10);
        assert_eq!(config.default_offset, 0);
    }

    #[test]
    fn present_values_override_defaults() {
        let config = PokemonConfig::from_lookup(lookup_from(&[
            (DEFAULT_LIMIT_ENV, " 25 "),
            (DEFAULT_OFFSET_ENV, "5"),
        ]))
        .unwrap();
        assert_eq!(config.default_limit, 25);
        assert_eq!(config.default_offset, 5);
    }

    #[test]
    fn unparsable_value_is_rejected() {
        let err = PokemonConfig::from_lookup(lookup_from(&[(DEFAULT_LIMIT_ENV, "ten")]))
            .unwrap_err();
        assert_eq!(err.key, DEFAULT_LIMIT_ENV);
        assert!(err.to_string().contains("ten"));
    }
}
