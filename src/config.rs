//! Configuration Module
//!
//! Handles loading and validating server configuration from environment
//! variables.

use std::env;

use crate::error::{BackstopError, Result};

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible
/// defaults. A zero value for any capacity, TTL, window or quota is rejected
/// by [`Config::validate`] rather than silently producing an unbounded or
/// inert component.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// Default TTL in seconds for entries without explicit TTL
    pub default_ttl: u64,
    /// Background sweep interval in seconds (cache and limiters)
    pub sweep_interval: u64,
    /// HTTP server port
    pub server_port: u16,
    /// General admission class: window length in milliseconds
    pub general_window_ms: u64,
    /// General admission class: requests allowed per window
    pub general_max_requests: u32,
    /// Write admission class (set/delete): window length in milliseconds
    pub write_window_ms: u64,
    /// Write admission class: requests allowed per window
    pub write_max_requests: u32,
    /// Bulk admission class (invalidate/clear): window length in milliseconds
    pub bulk_window_ms: u64,
    /// Bulk admission class: requests allowed per window
    pub bulk_max_requests: u32,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 500)
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 1800)
    /// - `SWEEP_INTERVAL` - Sweep frequency in seconds (default: 300)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `GENERAL_WINDOW_MS` / `GENERAL_MAX_REQUESTS` (default: 900000 / 100)
    /// - `WRITE_WINDOW_MS` / `WRITE_MAX_REQUESTS` (default: 60000 / 20)
    /// - `BULK_WINDOW_MS` / `BULK_MAX_REQUESTS` (default: 300000 / 10)
    pub fn from_env() -> Self {
        Self {
            max_entries: env_or("MAX_ENTRIES", 500),
            default_ttl: env_or("DEFAULT_TTL", 1800),
            sweep_interval: env_or("SWEEP_INTERVAL", 300),
            server_port: env_or("SERVER_PORT", 3000),
            general_window_ms: env_or("GENERAL_WINDOW_MS", 900_000),
            general_max_requests: env_or("GENERAL_MAX_REQUESTS", 100),
            write_window_ms: env_or("WRITE_WINDOW_MS", 60_000),
            write_max_requests: env_or("WRITE_MAX_REQUESTS", 20),
            bulk_window_ms: env_or("BULK_WINDOW_MS", 300_000),
            bulk_max_requests: env_or("BULK_MAX_REQUESTS", 10),
        }
    }

    /// Checks every numeric parameter, failing loudly on values that would
    /// leave a component unbounded or permanently rejecting.
    pub fn validate(&self) -> Result<()> {
        if self.max_entries == 0 {
            return Err(BackstopError::InvalidConfig(
                "MAX_ENTRIES must be greater than zero".to_string(),
            ));
        }
        if self.default_ttl == 0 {
            return Err(BackstopError::InvalidConfig(
                "DEFAULT_TTL must be greater than zero".to_string(),
            ));
        }
        if self.sweep_interval == 0 {
            return Err(BackstopError::InvalidConfig(
                "SWEEP_INTERVAL must be greater than zero".to_string(),
            ));
        }
        for (name, window, max) in [
            ("GENERAL", self.general_window_ms, self.general_max_requests),
            ("WRITE", self.write_window_ms, self.write_max_requests),
            ("BULK", self.bulk_window_ms, self.bulk_max_requests),
        ] {
            if window == 0 {
                return Err(BackstopError::InvalidConfig(format!(
                    "{}_WINDOW_MS must be greater than zero",
                    name
                )));
            }
            if max == 0 {
                return Err(BackstopError::InvalidConfig(format!(
                    "{}_MAX_REQUESTS must be greater than zero",
                    name
                )));
            }
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 500,
            default_ttl: 1800,
            sweep_interval: 300,
            server_port: 3000,
            general_window_ms: 900_000,
            general_max_requests: 100,
            write_window_ms: 60_000,
            write_max_requests: 20,
            bulk_window_ms: 300_000,
            bulk_max_requests: 10,
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
        assert_eq!(config.max_entries, 500);
        assert_eq!(config.default_ttl, 1800);
        assert_eq!(config.sweep_interval, 300);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.general_max_requests, 100);
        assert_eq!(config.write_max_requests, 20);
        assert_eq!(config.bulk_max_requests, 10);
    }

    #[test]
    fn test_config_default_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_config_rejects_zero_capacity() {
        let config = Config {
            max_entries: 0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(BackstopError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_config_rejects_zero_window() {
        let config = Config {
            write_window_ms: 0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(BackstopError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_config_rejects_zero_quota() {
        let config = Config {
            bulk_max_requests: 0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(BackstopError::InvalidConfig(_))
        ));
    }
}
