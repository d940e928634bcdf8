//! Server configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Error raised while loading configuration.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {message}")]
pub struct ConfigError {
    /// What went wrong.
    pub message: String,
}

impl ConfigError {
    /// Creates a new configuration error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Configuration for the HTTP room server.
#[derive(Debug, Clone, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_", into)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    host: String,

    /// Port to bind to.
    #[serde(default = "default_port")]
    port: u16,

    /// Path to the match-history database. History is disabled when unset.
    #[serde(default)]
    database_path: Option<String>,
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
            database_path: None,
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(host = %config.host, port = config.port, "Config loaded successfully");
        Ok(config)
    }

    /// Applies `FOURLINE_HOST`, `FOURLINE_PORT` and `FOURLINE_DB` overrides
    /// from the environment (populated from `.env` by the binary).
    #[instrument(skip(self))]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(host) = std::env::var("FOURLINE_HOST") {
            debug!(host = %host, "Host overridden from environment");
            self.host = host;
        }
        if let Ok(port) = std::env::var("FOURLINE_PORT")
            && let Ok(port) = port.parse()
        {
            debug!(port, "Port overridden from environment");
            self.port = port;
        }
        if let Ok(db) = std::env::var("FOURLINE_DB") {
            debug!(path = %db, "Database path overridden from environment");
            self.database_path = Some(db);
        }
        self
    }

    /// The socket address string to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
        assert!(config.database_path().is_none());
    }

    #[test]
    fn test_parses_partial_toml() {
        let config: ServerConfig = toml::from_str("port = 8080").expect("parse failed");
        assert_eq!(*config.port(), 8080);
        assert_eq!(config.host(), "127.0.0.1");
    }

    #[test]
    fn test_parses_full_toml() {
        let config: ServerConfig = toml::from_str(
            "host = \"0.0.0.0\"\nport = 9000\ndatabase_path = \"fourline.db\"",
        )
        .expect("parse failed");
        assert_eq!(config.bind_addr(), "0.0.0.0:9000");
        assert_eq!(config.database_path().as_deref(), Some("fourline.db"));
    }
}
