//! Configuration subsystem.
//!
//! Configuration is immutable once loaded: parse (serde/TOML), then semantic
//! validation, then shared by value with the subsystems that need it. All
//! fields default, so an empty config file — or none at all — is valid.

pub mod loader;
pub mod schema;

pub use loader::{load_config, ConfigError};
pub use schema::{GeminiConfig, HttpConfig, ServerConfig, TlsConfig};
