//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;
use std::time::Duration;

/// Remote tier URL used when `REDIS_URL` is not set.
pub const DEFAULT_REMOTE_URL: &str = "redis://localhost:6379/0";

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Connection string for the remote tier, None = local-only mode
    pub remote_url: Option<String>,
    /// Maximum number of entries the local tier can hold
    pub max_entries: usize,
    /// TTL in seconds applied by the local tier when none is given
    pub local_ttl: u64,
    /// Default TTL in seconds for writes without explicit TTL
    pub default_ttl: u64,
    /// Per-call timeout in seconds for remote tier I/O
    pub remote_timeout: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `REDIS_URL` - Remote tier URL (default: `redis://localhost:6379/0`, empty disables)
    /// - `CACHE_MAX_ENTRIES` - Maximum local entries (default: 1000)
    /// - `CACHE_LOCAL_TTL` - Local tier TTL in seconds (default: 3600)
    /// - `CACHE_DEFAULT_TTL` - Default write TTL in seconds (default: 3600)
    /// - `REMOTE_TIMEOUT` - Remote call timeout in seconds (default: 5)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            remote_url: match env::var("REDIS_URL") {
                Ok(url) if url.trim().is_empty() => None,
                Ok(url) => Some(url),
                Err(_) => defaults.remote_url,
            },
            max_entries: parse_var("CACHE_MAX_ENTRIES").unwrap_or(defaults.max_entries),
            local_ttl: parse_var("CACHE_LOCAL_TTL").unwrap_or(defaults.local_ttl),
            default_ttl: parse_var("CACHE_DEFAULT_TTL").unwrap_or(defaults.default_ttl),
            remote_timeout: parse_var("REMOTE_TIMEOUT").unwrap_or(defaults.remote_timeout),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
        }
    }

    /// Local tier TTL as a Duration.
    pub fn local_ttl(&self) -> Duration {
        Duration::from_secs(self.local_ttl)
    }

    /// Default write TTL as a Duration.
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl)
    }

    /// Remote call timeout as a Duration.
    pub fn remote_timeout(&self) -> Duration {
        Duration::from_secs(self.remote_timeout)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            remote_url: Some(DEFAULT_REMOTE_URL.to_string()),
            max_entries: 1000,
            local_ttl: 3600,
            default_ttl: 3600,
            remote_timeout: 5,
            server_port: 3000,
            cleanup_interval: 60,
        }
    }
}
