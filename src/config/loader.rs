//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ServerConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("validation failed: {0}")]
    Validation(String),
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: ServerConfig = toml::from_str(&content)?;
    validate_config(&config)?;
    Ok(config)
}

/// Semantic checks beyond what serde enforces.
pub fn validate_config(config: &ServerConfig) -> Result<(), ConfigError> {
    for (section, address) in [
        ("gemini", &config.gemini.bind_address),
        ("http", &config.http.bind_address),
    ] {
        if address.parse::<std::net::SocketAddr>().is_err() {
            return Err(ConfigError::Validation(format!(
                "{section}.bind_address {address:?} is not a socket address"
            )));
        }
    }
    if config.gemini.idle_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "gemini.idle_timeout_ms must be non-zero".to_string(),
        ));
    }
    if config.gemini.max_connections == 0 {
        return Err(ConfigError::Validation(
            "gemini.max_connections must be non-zero".to_string(),
        ));
    }
    Ok(())
}
