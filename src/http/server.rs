//! HTTP server setup and request translation.
//!
//! # Responsibilities
//! - Build the axum router that funnels every path and method into the
//!   shared handler
//! - Translate each HTTP request into a domain [`Request`] and the handler's
//!   [`Response`] back onto the wire
//! - Contain handler failures to the request that caused them
//! - Wrap each request in the shared trace-span shape

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, HeaderValue, Request as HttpRequest, StatusCode},
    response::{IntoResponse, Response as HttpResponse},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;
use tracing::{Instrument, Span};
use uuid::Uuid;

use crate::handler::Handler;
use crate::model::{Proto, Request, Response};
use crate::observability;

/// State injected into the dispatch handler.
#[derive(Clone)]
struct AppState {
    handler: Arc<dyn Handler>,
}

/// The HTTP side of the dual server.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(handler: Arc<dyn Handler>) -> Self {
        let state = AppState { handler };
        let router = Router::new()
            .route("/", any(dispatch))
            .route("/{*path}", any(dispatch))
            .with_state(state)
            .layer(TraceLayer::new_for_http());
        Self { router }
    }

    /// The underlying router, for driving the adapter without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        if let Ok(addr) = listener.local_addr() {
            tracing::info!(address = %addr, "HTTP server starting");
        }

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Translate one HTTP request through the shared handler.
async fn dispatch(State(state): State<AppState>, request: HttpRequest<Body>) -> HttpResponse {
    let client_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0);
    let user_agent = request
        .headers()
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let path = request.uri().path().to_string();

    let span = observability::request_span(Proto::Http, client_addr);
    span.record("request_id", tracing::field::display(Uuid::new_v4()));
    span.record("path", path.as_str());
    if let Some(user_agent) = &user_agent {
        span.record("user_agent", user_agent.as_str());
    }

    let handled = state
        .handler
        .handle(Request::new(path, Proto::Http))
        .instrument(span.clone())
        .await;

    match handled {
        Ok(response) => {
            let wire = translate(&span, response);
            span.record("status", u64::from(wire.status().as_u16()));
            wire
        }
        Err(error) => {
            let detail = format!("{error:#}");
            span.record("error", detail.as_str());
            tracing::error!(parent: &span, error = %detail, "handler failed");
            span.record("status", u64::from(StatusCode::INTERNAL_SERVER_ERROR.as_u16()));
            internal_error()
        }
    }
}

/// Map a domain response onto the wire, degrading to a generic 500 when the
/// response material cannot form valid header values.
fn translate(span: &Span, response: Response) -> HttpResponse {
    let status = super::status_code(response.status);

    if response.status.is_redirection() {
        match HeaderValue::from_str(&response.redirect_target()) {
            Ok(location) => (status, [(header::LOCATION, location)]).into_response(),
            Err(error) => {
                tracing::error!(parent: span, %error, "redirect target is not a valid header value");
                internal_error()
            }
        }
    } else {
        let content_type = HeaderValue::from_str(&response.content_type)
            .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
        (status, [(header::CONTENT_TYPE, content_type)], response.content).into_response()
    }
}

fn internal_error() -> HttpResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
}
