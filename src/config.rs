//! Configuration Module
//!
//! Handles loading and managing runtime configuration from environment variables.

use std::env;
use std::time::Duration;

/// Runtime configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// How long fetched pages stay cached, in seconds
    pub page_ttl: u64,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// HTTP fetch timeout in seconds
    pub fetch_timeout: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `PAGE_TTL` - Page cache TTL in seconds (default: 10)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 1)
    /// - `FETCH_TIMEOUT` - HTTP fetch timeout in seconds (default: 30)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            page_ttl: env_or("PAGE_TTL", defaults.page_ttl),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
            fetch_timeout: env_or("FETCH_TIMEOUT", defaults.fetch_timeout),
        }
    }

    pub fn page_ttl(&self) -> Duration {
        Duration::from_secs(self.page_ttl)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout)
    }
}

fn env_or(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_ttl: 10,
            cleanup_interval: 1,
            fetch_timeout: 30,
        }
    }
}
