//! Configuration management for urlstat CLI
//!
//! Defaults, then environment, then command-line flags.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

// ============================================================================
// CLI Configuration Constants
// ============================================================================

/// Directory scanned for input tables when none is configured.
pub const DEFAULT_INPUT_DIR: &str = "input";

/// Directory receiving `<name>_results.csv` tables when none is configured.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// How long a fetched record is reused before the URL is fetched again.
pub const DEFAULT_CACHE_TTL_MS: u64 = 250;

/// CLI configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding input tables
    pub input_dir: PathBuf,

    /// Directory receiving output tables
    pub output_dir: PathBuf,

    /// Cache entry lifespan; zero disables reuse
    #[serde(with = "millis")]
    pub cache_lifespan: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            cache_lifespan: Duration::from_millis(DEFAULT_CACHE_TTL_MS),
        }
    }
}

impl Config {
    /// Load config from environment variables
    ///
    /// - `URLSTAT_INPUT_DIR`
    /// - `URLSTAT_OUTPUT_DIR`
    /// - `URLSTAT_CACHE_TTL_MS`
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var("URLSTAT_INPUT_DIR") {
            config.input_dir = PathBuf::from(dir);
        }

        if let Ok(dir) = std::env::var("URLSTAT_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }

        if let Ok(ttl) = std::env::var("URLSTAT_CACHE_TTL_MS") {
            let millis: u64 = ttl.trim().parse().map_err(|_| {
                CliError::config(format!(
                    "URLSTAT_CACHE_TTL_MS must be a whole number of milliseconds, got '{}'",
                    ttl
                ))
            })?;
            config.cache_lifespan = Duration::from_millis(millis);
        }

        Ok(config)
    }

    /// Apply command-line overrides
    pub fn with_overrides(
        mut self,
        input_dir: Option<PathBuf>,
        output_dir: Option<PathBuf>,
        cache_ttl_ms: Option<u64>,
    ) -> Self {
        if let Some(dir) = input_dir {
            self.input_dir = dir;
        }
        if let Some(dir) = output_dir {
            self.output_dir = dir;
        }
        if let Some(ms) = cache_ttl_ms {
            self.cache_lifespan = Duration::from_millis(ms);
        }
        self
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        std::env::remove_var("URLSTAT_INPUT_DIR");
        std::env::remove_var("URLSTAT_OUTPUT_DIR");
        std::env::remove_var("URLSTAT_CACHE_TTL_MS");
    }

    #[test]
    #[serial]
    fn test_config_defaults() {
        clear_env();
        let config = Config::from_env().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.cache_lifespan, Duration::from_millis(250));
    }

    #[test]
    #[serial]
    fn test_config_from_env() {
        clear_env();
        std::env::set_var("URLSTAT_INPUT_DIR", "/tmp/in");
        std::env::set_var("URLSTAT_OUTPUT_DIR", "/tmp/out");
        std::env::set_var("URLSTAT_CACHE_TTL_MS", "0");

        let config = Config::from_env().unwrap();
        assert_eq!(config.input_dir, PathBuf::from("/tmp/in"));
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.cache_lifespan, Duration::ZERO);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_config_rejects_bad_ttl() {
        clear_env();
        std::env::set_var("URLSTAT_CACHE_TTL_MS", "soon");
        assert!(matches!(Config::from_env(), Err(CliError::Config(_))));
        clear_env();
    }

    #[test]
    fn test_overrides_win() {
        let config = Config::default().with_overrides(None, Some(PathBuf::from("elsewhere")), Some(5000));
        assert_eq!(config.input_dir, PathBuf::from(DEFAULT_INPUT_DIR));
        assert_eq!(config.output_dir, PathBuf::from("elsewhere"));
        assert_eq!(config.cache_lifespan, Duration::from_secs(5));
    }

    #[test]
    fn test_config_serializes_millis() {
        let json = serde_json::to_value(Config::default()).unwrap();
        assert_eq!(json["cache_lifespan"], 250);
    }
}
