//! Gemini listener: bounded accept loop and TLS handshake.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio_rustls::TlsAcceptor;

use crate::config::GeminiConfig;
use crate::gemini::connection::GeminiConnection;
use crate::handler::Handler;
use crate::net::listener::{BoundedListener, ListenerError};

/// The Gemini side of the dual server: accepts TLS connections and runs one
/// [`GeminiConnection`] task per accept.
pub struct GeminiServer {
    listener: BoundedListener,
    acceptor: TlsAcceptor,
    handler: Arc<dyn Handler>,
    idle_timeout: Duration,
}

impl GeminiServer {
    pub async fn bind(
        config: &GeminiConfig,
        acceptor: TlsAcceptor,
        handler: Arc<dyn Handler>,
    ) -> Result<Self, ListenerError> {
        let listener = BoundedListener::bind(&config.bind_address, config.max_connections).await?;
        Ok(Self {
            listener,
            acceptor,
            handler,
            idle_timeout: config.idle_timeout(),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.listener.local_addr()
    }

    /// Accept connections until the shutdown signal fires.
    ///
    /// Accept and handshake failures are logged and never stop the loop;
    /// every connection runs in its own task, so nothing one connection does
    /// can affect another or the listener itself.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        if let Ok(addr) = self.listener.local_addr() {
            tracing::info!(address = %addr, "Gemini server starting");
        }

        loop {
            tokio::select! {
                _ = shutdown.recv() => break,
                accepted = self.listener.accept() => {
                    let (stream, peer, permit) = match accepted {
                        Ok(accepted) => accepted,
                        Err(error) => {
                            tracing::warn!(%error, "accept failed");
                            continue;
                        }
                    };

                    let acceptor = self.acceptor.clone();
                    let handler = Arc::clone(&self.handler);
                    let idle_timeout = self.idle_timeout;
                    tokio::spawn(async move {
                        let _permit = permit;
                        match acceptor.accept(stream).await {
                            Ok(tls_stream) => {
                                GeminiConnection::new(tls_stream, peer, handler, idle_timeout)
                                    .run()
                                    .await;
                            }
                            Err(error) => {
                                tracing::debug!(peer_addr = %peer, %error, "TLS handshake failed");
                            }
                        }
                    });
                }
            }
        }

        tracing::info!("Gemini server stopped");
    }
}
