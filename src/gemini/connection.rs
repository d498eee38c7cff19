//! Gemini connection state machine.
//!
//! # Responsibilities
//! - Read exactly one request line, guarded by the idle deadline
//! - Validate scheme and CRLF framing; reject violations with code 59
//! - Dispatch the parsed request to the handler, recovering failures
//! - Write the meta line and body through the flow-control gate
//! - Close the stream on every path, ending the request span
//!
//! Connection states:
//!     AwaitingRequest → Dispatching → Responding → Closed
//! with ErrorClosed absorbing protocol violations and the idle timeout.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::watch;
use tokio::time::timeout;
use tracing::Instrument;
use url::Url;

use crate::handler::Handler;
use crate::model::{Proto, Request, Response, Status};
use crate::net::connection::ConnectionId;
use crate::observability;

/// Transport-level status code for protocol violations and the idle
/// timeout. Never produced by the handler-facing [`Status`] mapping.
const TRANSPORT_ERROR: u8 = 59;

/// Gemini caps request URLs at 1024 bytes; two more for the CRLF. A first
/// byte group with no terminator inside this window is a bad request.
const MAX_REQUEST_LINE: usize = 1026;

const GENERIC_ERROR_BODY: &[u8] = b"Internal server error";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    AwaitingRequest,
    Dispatching,
    Responding,
    Closed,
    ErrorClosed,
}

/// Flow-control gate for outbound writes.
///
/// A single-slot boolean signal: the connection awaits [`writable`] before
/// every write, and `pause`/`resume` toggle it. Connections start writable.
///
/// [`writable`]: WriteGate::writable
#[derive(Debug, Clone)]
pub struct WriteGate {
    tx: Arc<watch::Sender<bool>>,
}

impl WriteGate {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(true);
        Self { tx: Arc::new(tx) }
    }

    /// Hold back further writes until [`resume`](WriteGate::resume).
    pub fn pause(&self) {
        let _ = self.tx.send(false);
    }

    /// Reopen the gate, waking any waiting writer.
    pub fn resume(&self) {
        let _ = self.tx.send(true);
    }

    /// Wait until the gate is open. Safe to call any number of times.
    pub async fn writable(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives as long as self, so this cannot fail.
        let _ = rx.wait_for(|open| *open).await;
    }
}

impl Default for WriteGate {
    fn default() -> Self {
        Self::new()
    }
}

/// One Gemini connection: a freshly handshaken stream, serving exactly one
/// request and closing. Exclusively owned by its connection task.
pub struct GeminiConnection<S> {
    stream: S,
    peer: SocketAddr,
    handler: Arc<dyn Handler>,
    idle_timeout: Duration,
    gate: WriteGate,
    state: State,
    id: ConnectionId,
}

impl<S: AsyncRead + AsyncWrite + Unpin> GeminiConnection<S> {
    pub fn new(
        stream: S,
        peer: SocketAddr,
        handler: Arc<dyn Handler>,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            stream,
            peer,
            handler,
            idle_timeout,
            gate: WriteGate::new(),
            state: State::AwaitingRequest,
            id: ConnectionId::new(),
        }
    }

    /// Handle to this connection's flow-control gate.
    pub fn write_gate(&self) -> WriteGate {
        self.gate.clone()
    }

    /// Drive the connection to completion. The idle deadline starts now.
    ///
    /// All failures end here: protocol violations are answered on the wire,
    /// handler failures become an error response, and I/O errors close the
    /// connection. Nothing propagates to the caller.
    pub async fn run(mut self) {
        let span = observability::request_span(Proto::Gemini, Some(self.peer));
        span.record("request_id", tracing::field::display(self.id));
        async {
            if let Err(error) = self.serve().await {
                tracing::debug!(%error, "connection ended with I/O error");
            }
        }
        .instrument(span)
        .await;
    }

    async fn serve(&mut self) -> io::Result<()> {
        let mut buf = [0u8; MAX_REQUEST_LINE];
        let received = match timeout(self.idle_timeout, self.stream.read(&mut buf)).await {
            Err(_elapsed) => {
                return self.error_close("Connection timeout, closing").await;
            }
            Ok(Ok(0)) => {
                tracing::debug!("peer closed before sending a request");
                self.transition(State::Closed);
                return Ok(());
            }
            Ok(Ok(n)) => n,
            Ok(Err(error)) => {
                self.transition(State::Closed);
                return Err(error);
            }
        };

        // The first byte group has arrived; the idle deadline no longer
        // applies, no matter how long anything below takes.
        let data = &buf[..received];
        if data.len() >= 7 && !data.starts_with(b"gemini:") {
            return self.error_close("Only Gemini requests are supported").await;
        }
        let Some(line_len) = data.windows(2).position(|w| w == &b"\r\n"[..]) else {
            // The terminator must appear in the data delivered so far; the
            // request line is not accumulated across reads.
            return self.error_close("Bad Request").await;
        };
        let Ok(line) = std::str::from_utf8(&data[..line_len]) else {
            return self.error_close("Bad Request").await;
        };
        let Ok(url) = Url::parse(line) else {
            return self.error_close("Bad Request").await;
        };

        let path = url.path().to_string();
        tracing::Span::current().record("path", path.as_str());

        self.transition(State::Dispatching);
        let response = match self.handler.handle(Request::new(path, Proto::Gemini)).await {
            Ok(response) => response,
            Err(error) => {
                let detail = format!("{error:#}");
                tracing::Span::current().record("error", detail.as_str());
                tracing::error!(error = %detail, "handler failed");
                Response::new(GENERIC_ERROR_BODY, "text/gemini", Status::Error)
            }
        };

        self.transition(State::Responding);
        self.respond(&response).await
    }

    async fn respond(&mut self, response: &Response) -> io::Result<()> {
        let code = super::status_code(response.status);
        tracing::Span::current().record("status", u64::from(code));

        if response.status.is_redirection() {
            // Redirects carry the target in the meta field and no body.
            let target = response.redirect_target();
            self.write(format!("{code} {target}\r\n").as_bytes()).await?;
            tracing::info!(code, target = %target, "redirect sent");
        } else {
            self.write(format!("{code} {}\r\n", response.content_type).as_bytes())
                .await?;
            self.write(&response.content).await?;
            tracing::info!(code, content_length = response.content.len(), "response sent");
        }

        self.close().await
    }

    /// Answer a transport-level protocol error and close. The handler never
    /// sees these.
    async fn error_close(&mut self, reason: &str) -> io::Result<()> {
        self.transition(State::ErrorClosed);
        tracing::Span::current().record("status", u64::from(TRANSPORT_ERROR));
        tracing::warn!(code = TRANSPORT_ERROR, reason, "closing connection");
        self.write(format!("{TRANSPORT_ERROR} {reason}\r\n").as_bytes())
            .await?;
        self.close().await
    }

    /// Gate-guarded write: waits for the transport to be writable first.
    async fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.gate.writable().await;
        self.stream.write_all(bytes).await
    }

    async fn close(&mut self) -> io::Result<()> {
        self.stream.shutdown().await?;
        self.transition(State::Closed);
        Ok(())
    }

    fn transition(&mut self, next: State) {
        tracing::trace!(from = ?self.state, to = ?next, "state transition");
        self.state = next;
    }
}
