// Sweeper configuration
//
// Read from environment variables. Optional values fall back to defaults when
// absent or unparseable; only DATABASE_URL is mandatory.

use std::time::Duration;
use thiserror::Error;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_INTERVAL_SECS: u64 = 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),
}

/// Configuration for the realize sweep worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweeperConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub interval: Duration,
    pub run_migrations: bool,
    /// Run a single sweep and exit
    pub run_once: bool,
}

impl SweeperConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);

        let interval_secs = lookup("SWEEP_INTERVAL_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_INTERVAL_SECS)
            .max(1);

        Ok(Self {
            database_url,
            max_connections,
            interval: Duration::from_secs(interval_secs),
            run_migrations: parse_flag(lookup("RUN_MIGRATIONS"), true),
            run_once: parse_flag(lookup("SWEEP_RUN_ONCE"), false),
        })
    }
}

fn parse_flag(value: Option<String>, default: bool) -> bool {
    match value.as_deref().map(|v| v.trim().to_ascii_lowercase()) {
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => true,
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => false,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<SweeperConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        SweeperConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("DATABASE_URL", "postgres://localhost/collab")]).unwrap();
        assert_eq!(config.database_url, "postgres://localhost/collab");
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.interval, Duration::from_secs(60));
        assert!(config.run_migrations);
        assert!(!config.run_once);
    }

    #[test]
    fn test_missing_database_url() {
        assert_eq!(
            config_from(&[]).unwrap_err(),
            ConfigError::Missing("DATABASE_URL")
        );
        assert!(config_from(&[("DATABASE_URL", "  ")]).is_err());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://db/collab"),
            ("DATABASE_MAX_CONNECTIONS", "12"),
            ("SWEEP_INTERVAL_SECS", "15"),
            ("RUN_MIGRATIONS", "false"),
            ("SWEEP_RUN_ONCE", "1"),
        ])
        .unwrap();
        assert_eq!(config.max_connections, 12);
        assert_eq!(config.interval, Duration::from_secs(15));
        assert!(!config.run_migrations);
        assert!(config.run_once);
    }

    #[test]
    fn test_unparseable_values_fall_back() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://db/collab"),
            ("DATABASE_MAX_CONNECTIONS", "lots"),
            ("SWEEP_INTERVAL_SECS", "-3"),
            ("RUN_MIGRATIONS", "maybe"),
        ])
        .unwrap();
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.interval, Duration::from_secs(60));
        assert!(config.run_migrations);
    }

    #[test]
    fn test_interval_has_floor_of_one_second() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://db/collab"),
            ("SWEEP_INTERVAL_SECS", "0"),
        ])
        .unwrap();
        assert_eq!(config.interval, Duration::from_secs(1));
    }
}
