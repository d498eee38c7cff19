//! End-to-end tests: both protocols served concurrently from one handler,
//! over real sockets and real TLS.

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use dual_server::{Server, ServerConfig, Shutdown};

async fn start_server(
    handler: Arc<common::TestHandler>,
) -> (
    std::net::SocketAddr,
    std::net::SocketAddr,
    Shutdown,
    tokio::task::JoinHandle<Result<(), dual_server::ServeError>>,
    tempfile::TempDir,
) {
    let cert_dir = tempfile::tempdir().unwrap();
    let (cert, key) = common::generate_self_signed_cert(cert_dir.path());

    let mut config = ServerConfig::default();
    config.gemini.bind_address = "127.0.0.1:0".to_string();
    config.http.bind_address = "127.0.0.1:0".to_string();
    config.tls.cert_path = cert.display().to_string();
    config.tls.key_path = key.display().to_string();

    let server = Server::bind(handler, &config).await.unwrap();
    let gemini_addr = server.gemini_addr().unwrap();
    let http_addr = server.http_addr().unwrap();

    let shutdown = Shutdown::new();
    let run = tokio::spawn(server.run(shutdown.clone()));

    (gemini_addr, http_addr, shutdown, run, cert_dir)
}

#[tokio::test]
async fn serves_both_protocols_from_one_handler() {
    let handler = common::TestHandler::new();
    let (gemini_addr, http_addr, shutdown, run, _certs) = start_server(handler.clone()).await;

    // HTTP side.
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let reply = client
        .get(format!("http://{http_addr}/about"))
        .send()
        .await
        .unwrap();
    assert_eq!(reply.status(), 200);
    assert_eq!(reply.headers()["content-type"], "text/gemini");
    assert_eq!(reply.text().await.unwrap(), "# About");

    // Gemini side, same handler.
    let reply = common::gemini_request(gemini_addr, "gemini://localhost/about\r\n").await;
    assert_eq!(&reply[..], b"20 text/gemini\r\n# About");

    assert_eq!(handler.calls.load(Ordering::SeqCst), 2);

    drop(client);
    shutdown.trigger();
    run.await.unwrap().unwrap();
}

#[tokio::test]
async fn gemini_rejects_foreign_schemes_without_touching_the_handler() {
    let handler = common::TestHandler::new();
    let (gemini_addr, _http_addr, shutdown, run, _certs) = start_server(handler.clone()).await;

    let reply = common::gemini_request(gemini_addr, "http://x\r\n").await;
    assert_eq!(&reply[..], b"59 Only Gemini requests are supported\r\n");
    assert_eq!(handler.calls.load(Ordering::SeqCst), 0);

    shutdown.trigger();
    run.await.unwrap().unwrap();
}

#[tokio::test]
async fn handler_failure_leaves_both_listeners_serving() {
    let handler = common::TestHandler::new();
    let (gemini_addr, http_addr, shutdown, run, _certs) = start_server(handler.clone()).await;

    let reply = common::gemini_request(gemini_addr, "gemini://localhost/fail\r\n").await;
    assert_eq!(&reply[..], b"42 text/gemini\r\nInternal server error");

    // Both listeners survive the failure.
    let reply = common::gemini_request(gemini_addr, "gemini://localhost/about\r\n").await;
    assert_eq!(&reply[..], b"20 text/gemini\r\n# About");

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let reply = client
        .get(format!("http://{http_addr}/about"))
        .send()
        .await
        .unwrap();
    assert_eq!(reply.status(), 200);

    drop(client);
    shutdown.trigger();
    run.await.unwrap().unwrap();
}

#[tokio::test]
async fn gemini_redirection_is_meta_only() {
    let handler = common::TestHandler::new();
    let (gemini_addr, _http_addr, shutdown, run, _certs) = start_server(handler).await;

    let reply = common::gemini_request(gemini_addr, "gemini://localhost/moved\r\n").await;
    assert_eq!(&reply[..], b"31 gemini://localhost/about\r\n");

    shutdown.trigger();
    run.await.unwrap().unwrap();
}

#[tokio::test]
async fn http_redirection_is_not_followed_into_a_body() {
    let handler = common::TestHandler::new();
    let (_gemini_addr, http_addr, shutdown, run, _certs) = start_server(handler).await;

    let client = reqwest::Client::builder()
        .no_proxy()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();
    let reply = client
        .get(format!("http://{http_addr}/moved"))
        .send()
        .await
        .unwrap();
    assert_eq!(reply.status(), 308);
    assert_eq!(reply.headers()["location"], "gemini://localhost/about");

    drop(client);
    shutdown.trigger();
    run.await.unwrap().unwrap();
}
