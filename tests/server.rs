//! End-to-end tests through a running server.

use std::net::SocketAddr;
use std::time::Duration;

use api_forwarder::config::ForwarderConfig;
use api_forwarder::http::HttpServer;
use api_forwarder::lifecycle::Shutdown;
use axum::http::StatusCode;

mod common;

async fn start_server(backend: SocketAddr) -> (SocketAddr, Shutdown) {
    let mut config = ForwarderConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstream.base_url = format!("http://{backend}");

    let listener = tokio::net::TcpListener::bind(&config.listener.bind_address)
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

#[tokio::test]
async fn test_api_request_is_relayed() {
    let (backend, captures) =
        common::start_recording_backend(StatusCode::OK, r#"{"users":[]}"#).await;
    let (proxy, shutdown) = start_server(backend).await;

    let res = client()
        .get(format!("http://{proxy}/api/users?active=true"))
        .header("X-Client", "e2e")
        .send()
        .await
        .expect("proxy unreachable");

    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["content-type"], "application/json");
    assert_eq!(res.text().await.unwrap(), r#"{"users":[]}"#);

    {
        let captured = captures.lock().unwrap();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].uri, "/api/users?active=true");
        assert_eq!(captured[0].headers["x-client"], "e2e");
        // The client addressed the proxy; that Host travels to the backend.
        assert_eq!(captured[0].headers["host"], proxy.to_string().as_str());
    }

    shutdown.trigger();
}

#[tokio::test]
async fn test_host_routes_are_served_locally() {
    let (backend, captures) = common::start_recording_backend(StatusCode::OK, "{}").await;
    let (proxy, shutdown) = start_server(backend).await;
    let client = client();

    let res = client
        .get(format!("http://{proxy}/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "ok");

    let res = client
        .get(format!("http://{proxy}/dashboard"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);

    assert!(captures.lock().unwrap().is_empty());
    shutdown.trigger();
}

#[tokio::test]
async fn test_unreachable_backend_yields_502() {
    let (proxy, shutdown) = start_server(common::unreachable_addr()).await;

    let res = client()
        .post(format!("http://{proxy}/api/orders"))
        .header("Content-Type", "application/json")
        .body(r#"{"item":"x"}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 502);
    assert_eq!(res.headers()["content-type"], "application/json");
    let json: serde_json::Value = res.json().await.unwrap();
    assert_eq!(json, serde_json::json!({ "error": "Failed to reach API server" }));

    shutdown.trigger();
}

#[tokio::test]
async fn test_server_stops_on_shutdown() {
    let (backend, _) = common::start_recording_backend(StatusCode::OK, "{}").await;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let mut config = ForwarderConfig::default();
    config.upstream.base_url = format!("http://{backend}");
    let server = HttpServer::new(config).unwrap();

    let shutdown = Shutdown::new();
    let handle = tokio::spawn(server.run(listener, shutdown.subscribe()));

    shutdown.trigger();
    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server did not stop");
    assert!(result.unwrap().is_ok());
}
