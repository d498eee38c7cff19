//! Example dual-protocol server.
//!
//! Serves a hello page for every path, with protocol-appropriate markup, on
//! Gemini (TLS, port 1965) and HTTP (port 8000) at once. Bring your own
//! certificate:
//!
//! ```text
//! $ openssl req -x509 -newkey rsa:4096 -keyout key.pem -out cert.pem \
//!           -days 365 -nodes -subj /CN=localhost
//! $ dual-server --cert cert.pem --key key.pem
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use clap::Parser;

use dual_server::{
    config, observability, Handler, Proto, Request, Response, Server, ServerConfig, Shutdown,
    Status,
};

#[derive(Parser, Debug)]
#[command(name = "dual-server", about = "Serve one handler over Gemini and HTTP")]
struct Args {
    /// TOML configuration file; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the TLS certificate path.
    #[arg(long)]
    cert: Option<PathBuf>,

    /// Override the TLS private key path.
    #[arg(long)]
    key: Option<PathBuf>,

    /// Override the Gemini bind address.
    #[arg(long)]
    gemini_address: Option<String>,

    /// Override the HTTP bind address.
    #[arg(long)]
    http_address: Option<String>,
}

/// Greets every path.
struct HelloHandler;

#[async_trait]
impl Handler for HelloHandler {
    async fn handle(&self, request: Request) -> anyhow::Result<Response> {
        let response = match request.proto {
            Proto::Gemini => Response::new(
                format!("# Hello at {}\n", request.path),
                "text/gemini",
                Status::Ok,
            ),
            Proto::Http => Response::new(
                format!("<html><body><h1>Hello at {}</h1></body></html>", request.path),
                "text/html",
                Status::Ok,
            ),
        };
        Ok(response)
    }
}

fn load_config(args: &Args) -> Result<ServerConfig, config::ConfigError> {
    let mut loaded = match &args.config {
        Some(path) => config::load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(cert) = &args.cert {
        loaded.tls.cert_path = cert.display().to_string();
    }
    if let Some(key) = &args.key {
        loaded.tls.key_path = key.display().to_string();
    }
    if let Some(address) = &args.gemini_address {
        loaded.gemini.bind_address = address.clone();
    }
    if let Some(address) = &args.http_address {
        loaded.http.bind_address = address.clone();
    }
    Ok(loaded)
}

// One event loop multiplexes every connection on both protocols.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    observability::init("dual_server=debug,tower_http=debug");

    let args = Args::parse();
    let config = load_config(&args)?;

    tracing::info!(
        gemini_address = %config.gemini.bind_address,
        http_address = %config.http.bind_address,
        "configuration loaded"
    );

    let server = Server::bind(Arc::new(HelloHandler), &config).await?;
    let shutdown = Shutdown::new();
    let signal = shutdown.clone();
    tokio::spawn(async move { signal.trigger_on_ctrl_c().await });

    server.run(shutdown).await?;

    tracing::info!("shutdown complete");
    Ok(())
}
