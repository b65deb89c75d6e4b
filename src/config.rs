//! Server configuration.
//!
//! Game rules (guess count, clocks, player cap) are compile-time constants
//! in the core modules; this covers only the deployment surface: bind
//! address and the winner sink webhook.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Configuration for the game server.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    host: String,

    /// Port to bind to.
    #[serde(default = "default_port")]
    port: u16,

    /// Webhook URL winning submissions are posted to. When unset, winner
    /// submissions are reported as unconfigured rather than persisted.
    #[serde(default)]
    winner_sink_url: Option<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            winner_sink_url: None,
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!(path = %path.as_ref().display(), "Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(host = %config.host, port = config.port, "Config loaded");
        Ok(config)
    }

    /// Applies environment overrides (`WINNER_SINK_URL`).
    pub fn apply_env(mut self) -> Self {
        if let Ok(url) = std::env::var("WINNER_SINK_URL")
            && !url.is_empty()
        {
            debug!("Winner sink URL taken from environment");
            self.winner_sink_url = Some(url);
        }
        self
    }

    /// Overrides the bind host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Overrides the bind port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.host(), "127.0.0.1");
        assert_eq!(*config.port(), 3000);
        assert!(config.winner_sink_url().is_none());
    }

    #[test]
    fn test_from_file_with_partial_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = 8080").unwrap();
        writeln!(file, "winner_sink_url = \"https://example.test/hook\"").unwrap();

        let config = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.host(), "127.0.0.1");
        assert_eq!(*config.port(), 8080);
        assert_eq!(
            config.winner_sink_url().as_deref(),
            Some("https://example.test/hook")
        );
    }

    #[test]
    fn test_from_file_rejects_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = \"not a number\"").unwrap();
        assert!(ServerConfig::from_file(file.path()).is_err());
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::default()
            .with_host("0.0.0.0")
            .with_port(9000);
        assert_eq!(config.host(), "0.0.0.0");
        assert_eq!(*config.port(), 9000);
    }
}
