//! Bounded TCP accept for the Gemini listener.
//!
//! A semaphore enforces the configured connection limit: when it is
//! exhausted, accepts wait until a running connection finishes. The permit
//! travels with the connection task and is released on drop, so the limit
//! holds even when a task ends early.

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;

#[derive(Debug, Error)]
pub enum ListenerError {
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },
    #[error("failed to accept connection: {0}")]
    Accept(#[from] std::io::Error),
}

/// A TCP listener that limits concurrent connections.
pub struct BoundedListener {
    inner: TcpListener,
    connection_limit: Arc<Semaphore>,
}

impl BoundedListener {
    /// Bind to `address` with at most `max_connections` concurrent
    /// connections.
    pub async fn bind(address: &str, max_connections: usize) -> Result<Self, ListenerError> {
        let inner = TcpListener::bind(address)
            .await
            .map_err(|source| ListenerError::Bind {
                address: address.to_string(),
                source,
            })?;

        Ok(Self {
            inner,
            connection_limit: Arc::new(Semaphore::new(max_connections)),
        })
    }

    /// Accept a connection, waiting for a free slot first.
    ///
    /// The returned permit must be held for the connection's lifetime.
    pub async fn accept(&self) -> Result<(TcpStream, SocketAddr, ConnectionPermit), ListenerError> {
        let permit = self
            .connection_limit
            .clone()
            .acquire_owned()
            .await
            .expect("connection-limit semaphore closed unexpectedly");

        let (stream, addr) = self.inner.accept().await?;

        tracing::debug!(
            peer_addr = %addr,
            available_permits = self.connection_limit.available_permits(),
            "connection accepted"
        );

        Ok((stream, addr, ConnectionPermit { _permit: permit }))
    }

    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.inner.local_addr()
    }
}

/// A held connection slot, released back to the listener on drop.
#[derive(Debug)]
pub struct ConnectionPermit {
    _permit: tokio::sync::OwnedSemaphorePermit,
}
