//! Configuration Module
//!
//! Handles loading cache and driver configuration from environment variables.

use std::env;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Total byte budget, charged against live value lengths only
    pub cache_size: u64,
    /// Expected average item size, used only to size the bucket array
    pub average_item_size: u64,
    /// Fixed hash seed; `None` derives one from the wall clock
    pub hash_seed: Option<u32>,
    /// Number of round-robin inserts the demonstration driver performs
    pub demo_rounds: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_SIZE` - Total byte budget (default: 8192)
    /// - `AVERAGE_ITEM_SIZE` - Expected item size in bytes (default: 2048)
    /// - `HASH_SEED` - Fixed 32-bit hash seed (default: clock-derived)
    /// - `DEMO_ROUNDS` - Driver insert rounds (default: 1000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_size: parse_var("CACHE_SIZE").unwrap_or(defaults.cache_size),
            average_item_size: parse_var("AVERAGE_ITEM_SIZE")
                .unwrap_or(defaults.average_item_size),
            hash_seed: parse_var("HASH_SEED"),
            demo_rounds: parse_var("DEMO_ROUNDS").unwrap_or(defaults.demo_rounds),
        }
    }

    /// Number of buckets a cache built from this config will have.
    pub fn bucket_count(&self) -> u64 {
        self.cache_size
            .checked_div(self.average_item_size)
            .unwrap_or(0)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_size: 8 * 1024,
            average_item_size: 2 * 1024,
            hash_seed: None,
            demo_rounds: 1000,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.cache_size, 8192);
        assert_eq!(config.average_item_size, 2048);
        assert_eq!(config.hash_seed, None);
        assert_eq!(config.demo_rounds, 1000);
        assert_eq!(config.bucket_count(), 4);
    }

    #[test]
    fn test_config_from_env() {
        // Single test touches the environment to avoid races between tests
        env::remove_var("CACHE_SIZE");
        env::remove_var("AVERAGE_ITEM_SIZE");
        env::remove_var("HASH_SEED");
        env::remove_var("DEMO_ROUNDS");
        assert_eq!(Config::from_env(), Config::default());

        env::set_var("CACHE_SIZE", "65536");
        env::set_var("HASH_SEED", "42");
        env::set_var("DEMO_ROUNDS", "not-a-number");
        let config = Config::from_env();
        assert_eq!(config.cache_size, 65536);
        assert_eq!(config.hash_seed, Some(42));
        assert_eq!(config.demo_rounds, 1000);
        assert_eq!(config.bucket_count(), 32);

        env::remove_var("CACHE_SIZE");
        env::remove_var("HASH_SEED");
        env::remove_var("DEMO_ROUNDS");
    }

    #[test]
    fn test_bucket_count_zero_item_size() {
        let config = Config {
            average_item_size: 0,
            ..Config::default()
        };
        assert_eq!(config.bucket_count(), 0);
    }
}
