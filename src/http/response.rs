//! Response handling.
//!
//! # Responsibilities
//! - Relay the backend response to the client unchanged
//! - Produce the fixed 502 response when the backend cannot be reached
//!
//! # Design Decisions
//! - Backend bodies are buffered in full before the relay starts
//! - Backend error statuses are relayed, never rewritten
//! - `Transfer-Encoding` is dropped; the server recomputes framing for the
//!   buffered body

use axum::{
    body::Body,
    http::{header::TRANSFER_ENCODING, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use hyper::ext::ReasonPhrase;
use serde::Serialize;

use crate::forward::error::ForwardError;

/// Message returned to clients when the backend is unreachable.
pub const GATEWAY_FAILURE_MESSAGE: &str = "Failed to reach API server";

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
}

/// `502 Bad Gateway` with `{"error":"Failed to reach API server"}`.
pub fn gateway_failure() -> Response {
    (
        StatusCode::BAD_GATEWAY,
        Json(ErrorBody {
            error: GATEWAY_FAILURE_MESSAGE,
        }),
    )
        .into_response()
}

/// Read the backend response in full and rebuild it for the client.
///
/// Status code, reason phrase, headers and body are copied as received.
pub async fn relay_response(upstream: reqwest::Response) -> Result<Response, ForwardError> {
    let status = upstream.status();
    let reason = upstream.extensions().get::<ReasonPhrase>().cloned();
    let mut headers = upstream.headers().clone();
    let body = upstream.bytes().await?;

    headers.remove(TRANSFER_ENCODING);

    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    if let Some(reason) = reason {
        response.extensions_mut().insert(reason);
    }
    Ok(response)
}
