//! One handler, two wire protocols.
//!
//! `dual-server` serves a single application [`Handler`] simultaneously over
//! Gemini (a minimal line-oriented protocol on TLS, one request per
//! connection) and HTTP, through one protocol-agnostic [`Request`] /
//! [`Response`] contract.
//!
//! ```text
//!                 ┌──────────────────────────────────────────┐
//!                 │                dual-server                │
//!   gemini://…    │  ┌────────────────┐                       │
//!   ──────────────┼─▶│ gemini adapter │──┐   ┌─────────────┐  │
//!                 │  └────────────────┘  ├──▶│   Handler   │  │
//!   http://…      │  ┌────────────────┐  │   │ (app code)  │  │
//!   ──────────────┼─▶│  http adapter  │──┘   └─────────────┘  │
//!                 │  └────────────────┘                       │
//!                 └──────────────────────────────────────────┘
//! ```
//!
//! The adapters own everything protocol-shaped: framing, status-code
//! mapping, idle timeouts, backpressure, and the per-request trace span.
//! The handler sees only paths and statuses.

// Protocol adapters
pub mod gemini;
pub mod http;

// Domain contract
pub mod handler;
pub mod model;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod server;

pub use config::ServerConfig;
pub use handler::Handler;
pub use lifecycle::Shutdown;
pub use model::{Proto, Request, Response, Status};
pub use server::{ServeError, Server};
