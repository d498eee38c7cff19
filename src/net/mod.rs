//! Network layer for the Gemini listener.
//!
//! ```text
//! Incoming TCP connection
//!     → listener.rs (accept loop, connection limit)
//!     → tls.rs (TLS handshake via the configured acceptor)
//!     → gemini::connection (one request, one response, close)
//! ```
//!
//! The HTTP side does not pass through here; axum owns its transport.

pub mod connection;
pub mod listener;
pub mod tls;
