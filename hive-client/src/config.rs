//! Configuration for the clock client.

use std::path::Path;
use std::time::Duration;

use config::builder::DefaultState;
use config::{Config as ConfigLoader, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

use crate::error::{Error, Result};

/// Main configuration structure for the clock client.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub connection: ConnectionConfig,
    #[serde(default)]
    pub clock: ClockConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// WebSocket endpoint to connect to.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionConfig {
    /// Full endpoint URL (`ws://` or `wss://`), fixed for the process lifetime.
    #[serde(default = "default_ws_url")]
    pub ws_url: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            ws_url: default_ws_url(),
        }
    }
}

/// Outbound clock frame cadence.
#[derive(Debug, Clone, Deserialize)]
pub struct ClockConfig {
    #[serde(default = "default_interval")]
    pub interval_secs: u64,
}

impl ClockConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when RUST_LOG is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// Default values
fn default_ws_url() -> String {
    "wss://myserver.domain/hive-ws/".to_string()
}
fn default_interval() -> u64 {
    60
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Configuration sources (in order of precedence):
    /// 1. Environment variables (HIVE__SECTION__KEY format)
    /// 2. config.toml file (if present)
    /// 3. Built-in defaults
    pub fn load() -> Result<Self> {
        let builder = Self::defaults()?
            .add_source(File::with_name("config").required(false))
            .add_source(
                Environment::with_prefix("HIVE")
                    .separator("__")
                    .try_parsing(true),
            );
        Self::finish(builder)
    }

    /// Load configuration from a specific file, without environment overrides.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let builder = Self::defaults()?.add_source(File::from(path.as_ref()));
        Self::finish(builder)
    }

    fn defaults() -> std::result::Result<ConfigBuilder<DefaultState>, ConfigError> {
        ConfigLoader::builder()
            .set_default("connection.ws_url", default_ws_url())?
            .set_default("clock.interval_secs", default_interval() as i64)?
            .set_default("logging.level", default_log_level())
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the client cannot run with.
    pub fn validate(&self) -> Result<()> {
        let url = self.connection.ws_url.as_str();
        if !(url.starts_with("ws://") || url.starts_with("wss://")) {
            return Err(Error::InvalidConfig(format!(
                "connection.ws_url must use ws:// or wss://, got '{}'",
                url
            )));
        }
        if self.clock.interval_secs == 0 {
            return Err(Error::InvalidConfig(
                "clock.interval_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
