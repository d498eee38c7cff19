//! Dual-listener orchestration.
//!
//! Lifecycle composition only: build the TLS acceptor, bind both listeners
//! against the one shared handler, and run them as independent tasks. No
//! protocol logic lives here.

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinError;

use crate::config::ServerConfig;
use crate::gemini::GeminiServer;
use crate::handler::Handler;
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::net::listener::ListenerError;
use crate::net::tls::{self, TlsError};

#[derive(Debug, Error)]
pub enum ServeError {
    #[error("TLS setup failed: {0}")]
    Tls(#[from] TlsError),
    #[error(transparent)]
    Listener(#[from] ListenerError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("listener task aborted: {0}")]
    Join(#[from] JoinError),
}

/// Both listeners, bound and ready to serve one handler.
pub struct Server {
    gemini: GeminiServer,
    http: HttpServer,
    http_listener: TcpListener,
}

impl Server {
    /// Build the TLS acceptor and bind both listeners.
    pub async fn bind(handler: Arc<dyn Handler>, config: &ServerConfig) -> Result<Self, ServeError> {
        let acceptor = tls::build_acceptor(&config.tls)?;
        let gemini = GeminiServer::bind(&config.gemini, acceptor, Arc::clone(&handler)).await?;
        let http_listener = TcpListener::bind(&config.http.bind_address).await?;
        let http = HttpServer::new(handler);

        Ok(Self {
            gemini,
            http,
            http_listener,
        })
    }

    /// Bound Gemini address (useful when configured with port 0).
    pub fn gemini_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.gemini.local_addr()
    }

    /// Bound HTTP address (useful when configured with port 0).
    pub fn http_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.http_listener.local_addr()
    }

    /// Run both listeners until `shutdown` fires.
    ///
    /// Each listener runs in its own task for its whole lifetime: a stall,
    /// error, or load spike on one never degrades the other.
    pub async fn run(self, shutdown: Shutdown) -> Result<(), ServeError> {
        let gemini = tokio::spawn(self.gemini.run(shutdown.subscribe()));
        let http = tokio::spawn(self.http.run(self.http_listener, shutdown.subscribe()));

        let ((), http_result) = tokio::try_join!(gemini, http)?;
        http_result?;
        Ok(())
    }
}
