//! Server configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Settings for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to.
    #[serde(default = "default_host")]
    host: String,

    /// Port to bind to.
    #[serde(default = "default_port")]
    port: u16,

    /// `tracing` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    log_filter: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_filter() -> String {
    "info,knots_server=debug,knots_core=debug".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_filter: default_log_filter(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a TOML file. Missing keys take defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(host = %config.host, port = config.port, "Config loaded");
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise returns defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Applies command-line overrides on top of the loaded values.
    pub fn with_overrides(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    /// Renders the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string(self)
            .map_err(|e| ConfigError::new(format!("Failed to serialize config: {}", e)))
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
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.host(), "127.0.0.1");
        assert_eq!(*config.port(), 3000);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "port = 8080").unwrap();

        let config = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(*config.port(), 8080);
        assert_eq!(config.host(), "127.0.0.1");
        assert_eq!(config.log_filter(), &default_log_filter());
    }

    #[test]
    fn test_bad_file_reports_location() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "port = \"not a number\"").unwrap();

        let err = ServerConfig::from_file(file.path()).unwrap_err();
        assert!(err.message.starts_with("Failed to parse config"));
        assert!(err.file.ends_with("config.rs"));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig::load_or_default(dir.path().join("knots.toml")).unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_overrides_win() {
        let config = ServerConfig::default().with_overrides(Some("0.0.0.0".into()), Some(9000));
        assert_eq!(config.host(), "0.0.0.0");
        assert_eq!(*config.port(), 9000);

        let round_trip: ServerConfig = toml::from_str(&config.to_toml().unwrap()).unwrap();
        assert_eq!(round_trip, config);
    }
}
