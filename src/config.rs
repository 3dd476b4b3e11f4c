//! Configuration module for relaychat.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::{ChatError, Result};

/// Environment variable overriding [`RelayConfig::endpoint`].
pub const ENV_ENDPOINT: &str = "RELAYCHAT_ENDPOINT";

/// Environment variable overriding [`LoggingConfig::level`].
pub const ENV_LOG_LEVEL: &str = "RELAYCHAT_LOG_LEVEL";

/// Relay connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    /// WebSocket endpoint of the relay.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Handshake timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Time allowed for a graceful close before the channel is aborted.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_ms: u64,
    /// Number of inbound events buffered between the socket and the client.
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

fn default_endpoint() -> String {
    "ws://localhost:3000/".to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_shutdown_timeout() -> u64 {
    1000
}

fn default_event_channel_capacity() -> usize {
    256
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            connect_timeout_secs: default_connect_timeout(),
            shutdown_timeout_ms: default_shutdown_timeout(),
            event_channel_capacity: default_event_channel_capacity(),
        }
    }
}

impl RelayConfig {
    /// Handshake timeout as a [`Duration`].
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Graceful close timeout as a [`Duration`].
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/relaychat.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Relay connection configuration.
    #[serde(default)]
    pub relay: RelayConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ChatError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| ChatError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `RELAYCHAT_ENDPOINT`: relay WebSocket endpoint
    /// - `RELAYCHAT_LOG_LEVEL`: log level
    ///
    /// Empty values are ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(endpoint) = std::env::var(ENV_ENDPOINT) {
            if !endpoint.is_empty() {
                self.relay.endpoint = endpoint;
            }
        }
        if let Ok(level) = std::env::var(ENV_LOG_LEVEL) {
            if !level.is_empty() {
                self.logging.level = level;
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - the endpoint is not a `ws://` URL
    /// - the event channel capacity is zero
    pub fn validate(&self) -> Result<()> {
        let endpoint = url::Url::parse(&self.relay.endpoint).map_err(|e| {
            ChatError::Config(format!("invalid relay endpoint {:?}: {e}", self.relay.endpoint))
        })?;
        if endpoint.scheme() != "ws" {
            return Err(ChatError::Config(format!(
                "relay endpoint must use the ws scheme, got {:?}",
                endpoint.scheme()
            )));
        }
        if self.relay.event_channel_capacity == 0 {
            return Err(ChatError::Config(
                "event_channel_capacity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
