//! Configuration loading
//!
//! All settings have defaults, so the relay runs without a config file.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Default listen address (the port the relay has always used)
pub const DEFAULT_LISTEN: &str = "127.0.0.1:6666";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Relay configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Address to bind the TCP listener on.
    pub listen: String,
    /// Appended to every outbound line.
    pub line_terminator: String,
    /// Longest accepted inbound line in bytes; longer lines end the session.
    pub max_line_length: usize,
    /// Capacity of each session's outbound message channel.
    pub outbound_buffer: usize,
    /// Capacity of the ChatServer command queue.
    pub command_buffer: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: DEFAULT_LISTEN.to_string(),
            line_terminator: "\n\r".to_string(),
            max_line_length: 4096,
            outbound_buffer: 32,
            command_buffer: 256,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_config() {
        let config = Config::parse(
            r#"
            listen = "0.0.0.0:7000"
            line_terminator = "\r\n"
            "#,
        )
        .unwrap();

        assert_eq!(config.listen, "0.0.0.0:7000");
        assert_eq!(config.line_terminator, "\r\n");
        assert_eq!(config.max_line_length, 4096);
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            Config::parse("max_line_length = \"lots\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            Config::load("/nonexistent/chat_relay.toml"),
            Err(ConfigError::Io(_))
        ));
    }
}
