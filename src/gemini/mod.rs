//! Gemini protocol adapter.
//!
//! # Data Flow
//! ```text
//! TLS connection (one request each)
//!     → server.rs (bounded accept loop, TLS handshake)
//!     → connection.rs (request line → handler → meta line + body)
//!     → close
//! ```
//!
//! Gemini is deliberately minimal: a request is a single CRLF-terminated URL
//! line, a response is a `<code> <meta>` line followed by raw body bytes,
//! and every connection carries exactly one request.

pub mod connection;
pub mod server;

pub use connection::{GeminiConnection, WriteGate};
pub use server::GeminiServer;

use crate::model::Status;

/// Gemini wire status code for an abstract status.
///
/// Total by construction: adding a `Status` variant without extending this
/// match is a compile error.
pub fn status_code(status: Status) -> u8 {
    match status {
        Status::Ok => 20,
        Status::NotFound => 51,
        Status::Error => 42,
        Status::TemporaryRedirection => 30,
        Status::PermanentRedirection => 31,
    }
}
