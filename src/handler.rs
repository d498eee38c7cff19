//! The application-facing handler contract.

use async_trait::async_trait;

use crate::model::{Request, Response};

/// A request handler shared by both protocol adapters.
///
/// One instance serves every connection on both listeners concurrently, so
/// implementations must be safe under concurrent invocation (the `Send +
/// Sync` bounds enforce freedom from data races; semantic safety is the
/// implementor's obligation). The adapters invoke it read-only and never
/// mutate it.
///
/// Returning `Err` signals a handler failure: the adapter that issued the
/// call recovers it, answers the peer with a generic error response, and
/// records the detail on the request span.
#[async_trait]
pub trait Handler: Send + Sync + 'static {
    async fn handle(&self, request: Request) -> anyhow::Result<Response>;
}
