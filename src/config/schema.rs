//! Configuration schema definitions.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the dual-protocol server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Gemini listener settings.
    pub gemini: GeminiConfig,

    /// HTTP listener settings.
    pub http: HttpConfig,

    /// TLS certificate/key for the Gemini listener.
    pub tls: TlsConfig,
}

/// Gemini listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// Bind address; 1965 is the protocol-standard port.
    pub bind_address: String,

    /// How long a connection may stay silent before it is closed with a
    /// timeout status. Counted from handshake completion to the first bytes.
    pub idle_timeout_ms: u64,

    /// Maximum concurrent connections (backpressure).
    pub max_connections: usize,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:1965".to_string(),
            idle_timeout_ms: 5_000,
            max_connections: 10_000,
        }
    }
}

impl GeminiConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Bind address (e.g. "0.0.0.0:8000").
    pub bind_address: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
        }
    }
}

/// TLS configuration for the Gemini listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            cert_path: "cert.pem".to_string(),
            key_path: "key.pem".to_string(),
        }
    }
}
