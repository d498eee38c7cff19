//! Tracing initialisation and the shared request-span contract.
//!
//! Both protocol adapters wrap each request in exactly one span of the shape
//! produced by [`request_span`]: opened on arrival, closed on every exit
//! path (scope drop), never reused across requests. Export backends are out
//! of scope; anything stacked on the `tracing` subscriber sees these spans.

use std::net::SocketAddr;

use tracing::field;
use tracing::Span;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::model::Proto;

/// Initialize the tracing subscriber.
///
/// `default_filter` applies when `RUST_LOG` is unset.
pub fn init(default_filter: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Open the per-request span shared by both protocol adapters.
///
/// `path`, `user_agent` (HTTP only), `request_id`, and `status` (the mapped
/// wire code, or 59 for Gemini transport errors) are recorded as they become
/// known; `error` marks the span errored and carries the handler failure
/// detail, which is never disclosed to the peer. `client_addr` may be absent
/// when the transport cannot report a peer address.
pub fn request_span(proto: Proto, client_addr: Option<SocketAddr>) -> Span {
    let span = tracing::info_span!(
        "request",
        scheme = proto.scheme(),
        client_addr = field::Empty,
        path = field::Empty,
        user_agent = field::Empty,
        request_id = field::Empty,
        status = field::Empty,
        error = field::Empty,
    );
    if let Some(addr) = client_addr {
        span.record("client_addr", field::display(addr));
    }
    span
}
