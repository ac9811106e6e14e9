//! Shared utilities for integration tests.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use api_forwarder::forward::{ErrorReporter, ForwardFailure};
use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{
        header::{CONTENT_TYPE, LOCATION},
        HeaderMap, Method, Request, StatusCode, Uri,
    },
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// A request as the backend saw it.
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

pub type Captures = Arc<Mutex<Vec<Captured>>>;

type BackendState = (Captures, StatusCode, &'static str);

/// Start a backend that records every request and answers with a fixed
/// JSON response.
pub async fn start_recording_backend(
    status: StatusCode,
    body: &'static str,
) -> (SocketAddr, Captures) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let captures = Captures::default();

    let app = Router::new()
        .fallback(record)
        .with_state((captures.clone(), status, body));

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, captures)
}

async fn record(
    State((captures, status, body)): State<BackendState>,
    request: Request<Body>,
) -> Response {
    let (parts, inbound) = request.into_parts();
    let bytes = axum::body::to_bytes(inbound, usize::MAX).await.unwrap();
    captures.lock().unwrap().push(Captured {
        method: parts.method,
        uri: parts.uri,
        headers: parts.headers,
        body: bytes,
    });
    (status, [(CONTENT_TYPE, "application/json")], body).into_response()
}

/// Start a backend that answers `/api/old` with a 307 to `/api/new`, and
/// `/api/new` with `200 final`.
pub async fn start_redirecting_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let app = Router::new()
        .route(
            "/api/old",
            get(|| async { (StatusCode::TEMPORARY_REDIRECT, [(LOCATION, "/api/new")]) }),
        )
        .route("/api/new", get(|| async { "final" }));

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

/// Start a backend that writes `response` verbatim on every connection.
pub async fn start_raw_backend(response: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buf = [0u8; 4096];
                        let _ = socket.read(&mut buf).await;
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// An address nothing listens on.
pub fn unreachable_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Reporter that keeps every failure as `"METHOD path -> error"`.
#[derive(Default)]
pub struct RecordingReporter {
    pub reports: Mutex<Vec<String>>,
}

impl ErrorReporter for RecordingReporter {
    fn report(&self, failure: &ForwardFailure<'_>) {
        self.reports.lock().unwrap().push(format!(
            "{} {} -> {}",
            failure.method, failure.path, failure.error
        ));
    }
}

impl RecordingReporter {
    pub fn count(&self) -> usize {
        self.reports.lock().unwrap().len()
    }
}

pub async fn body_bytes(response: Response) -> Bytes {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
}
