//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Max age in milliseconds for added entries that don't specify one (0 = never stale)
    pub default_max_age: i64,
    /// Staleness report interval in seconds
    pub report_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `DEFAULT_MAX_AGE` - Default max age in milliseconds (default: 0, never stale)
    /// - `REPORT_INTERVAL` - Staleness report frequency in seconds (default: 30)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            default_max_age: env::var("DEFAULT_MAX_AGE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|age: &i64| *age >= 0)
                .unwrap_or(defaults.default_max_age),
            report_interval: env::var("REPORT_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|secs: &u64| *secs > 0)
                .unwrap_or(defaults.report_interval),
        }
    }

    /// The configured default max age, with 0 meaning none.
    pub fn default_max_age(&self) -> Option<i64> {
        Some(self.default_max_age).filter(|age| *age > 0)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            default_max_age: 0,
            report_interval: 30,
        }
    }
}
