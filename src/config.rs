//! Configuration Module
//!
//! Handles loading the in-memory store configuration from environment variables.

use std::env;

use crate::error::{CacheError, Result};

/// In-memory store configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of entries the store can hold before LRU eviction
    pub max_entries: usize,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum store entries (default: 1000)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 1)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: env_or("MAX_ENTRIES", defaults.max_entries),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
        }
    }

    /// Rejects values the store cannot operate with.
    pub fn validate(&self) -> Result<()> {
        if self.max_entries == 0 {
            return Err(CacheError::InvalidArgument(
                "max_entries must be greater than zero".to_string(),
            ));
        }
        if self.cleanup_interval == 0 {
            return Err(CacheError::InvalidArgument(
                "cleanup_interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            cleanup_interval: 1,
        }
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.max_entries, 1000);
        assert_eq!(config.cleanup_interval, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_env() {
        // Both cases share one test so they never race on the same variables
        env::remove_var("MAX_ENTRIES");
        env::remove_var("CLEANUP_INTERVAL");
        assert_eq!(Config::from_env(), Config::default());

        env::set_var("MAX_ENTRIES", "64");
        env::set_var("CLEANUP_INTERVAL", "not-a-number");
        let config = Config::from_env();
        assert_eq!(config.max_entries, 64);
        assert_eq!(config.cleanup_interval, 1);

        env::remove_var("MAX_ENTRIES");
        env::remove_var("CLEANUP_INTERVAL");
    }

    #[test]
    fn test_config_validate_rejects_zero() {
        let config = Config {
            max_entries: 0,
            cleanup_interval: 1,
        };
        assert!(matches!(
            config.validate(),
            Err(CacheError::InvalidArgument(_))
        ));

        let config = Config {
            max_entries: 10,
            cleanup_interval: 0,
        };
        assert!(matches!(
            config.validate(),
            Err(CacheError::InvalidArgument(_))
        ));
    }
}
