//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::error::ConfigError;
use crate::worker::VariantSelection;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Which worker variant to run
    pub variant: VariantSelection,
    /// Delay between two work units in milliseconds
    pub notify_interval_ms: u64,
    /// Number of work units before the counter wraps back to 1
    pub notify_batch_size: u32,
    /// Delay performed by each delaying start hook in milliseconds
    pub hook_delay_ms: u64,
    /// Upper bound on waiting for the worker during shutdown, in seconds
    pub shutdown_timeout: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `WORKER_VARIANT` - background, hosted, lifecycle or random (default: random)
    /// - `NOTIFY_INTERVAL_MS` - Delay between work units (default: 5000)
    /// - `NOTIFY_BATCH_SIZE` - Counter wrap point (default: 5)
    /// - `HOOK_DELAY_MS` - Start hook delay (default: 5000)
    /// - `SHUTDOWN_TIMEOUT_SECS` - Shutdown wait bound (default: 30)
    ///
    /// Numeric values that fail to parse fall back to their default. An
    /// unknown variant name is rejected.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let variant = match env::var("WORKER_VARIANT") {
            Ok(raw) if !raw.trim().is_empty() => raw.parse()?,
            _ => defaults.variant,
        };

        Ok(Self {
            server_port: parse_or("SERVER_PORT", defaults.server_port),
            variant,
            notify_interval_ms: parse_or("NOTIFY_INTERVAL_MS", defaults.notify_interval_ms),
            notify_batch_size: parse_or("NOTIFY_BATCH_SIZE", defaults.notify_batch_size).max(1),
            hook_delay_ms: parse_or("HOOK_DELAY_MS", defaults.hook_delay_ms),
            shutdown_timeout: parse_or("SHUTDOWN_TIMEOUT_SECS", defaults.shutdown_timeout),
        })
    }

    /// Interval between work units.
    pub fn notify_interval(&self) -> Duration {
        Duration::from_millis(self.notify_interval_ms)
    }

    /// Delay used by the lifecycle variant's start hooks.
    pub fn hook_delay(&self) -> Duration {
        Duration::from_millis(self.hook_delay_ms)
    }

    /// Shutdown wait bound.
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout)
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            variant: VariantSelection::Random,
            notify_interval_ms: 5000,
            notify_batch_size: 5,
            hook_delay_ms: 5000,
            shutdown_timeout: 30,
        }
    }
}
