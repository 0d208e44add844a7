//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::cache::CacheSettings;
use crate::error::ConfigError;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// TTL in seconds for requests that do not specify one
    pub default_ttl: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Expiration sweep interval in seconds, independent of entry TTLs
    pub sweep_interval: u64,
    /// Maximum number of keys waiting for deferred removal
    pub pending_removal_limit: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 300)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `SWEEP_INTERVAL` - Expiration sweep period in seconds (default: 1)
    /// - `PENDING_REMOVAL_LIMIT` - Deferred removal bound (default: `MAX_ENTRIES`)
    ///
    /// Unset variables fall back to defaults; set but invalid ones are errors.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let max_entries = parse_var(&lookup, "MAX_ENTRIES", defaults.max_entries)?;
        let config = Self {
            max_entries,
            default_ttl: parse_var(&lookup, "DEFAULT_TTL", defaults.default_ttl)?,
            server_port: parse_var(&lookup, "SERVER_PORT", defaults.server_port)?,
            sweep_interval: parse_var(&lookup, "SWEEP_INTERVAL", defaults.sweep_interval)?,
            pending_removal_limit: parse_var(&lookup, "PENDING_REMOVAL_LIMIT", max_entries)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Rejects values the cache or server cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("MAX_ENTRIES", self.max_entries as u64),
            ("SERVER_PORT", u64::from(self.server_port)),
            ("SWEEP_INTERVAL", self.sweep_interval),
            ("PENDING_REMOVAL_LIMIT", self.pending_removal_limit as u64),
        ];

        for (name, value) in positive {
            if value == 0 {
                return Err(ConfigError::Zero(name));
            }
        }
        Ok(())
    }

    /// Cache construction parameters derived from this configuration.
    pub fn cache_settings(&self) -> CacheSettings {
        CacheSettings::new(self.max_entries, Duration::from_secs(self.sweep_interval))
            .with_pending_limit(self.pending_removal_limit)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            default_ttl: 300,
            server_port: 3000,
            sweep_interval: 1,
            pending_removal_limit: 1000,
        }
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        Some(raw) => {
            let parsed = raw.trim().parse();
            parsed.map_err(|_| ConfigError::Invalid { name, value: raw })
        }
        None => Ok(default),
    }
}
