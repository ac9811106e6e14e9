//! Metrics collection and exposition.
//!
//! # Metrics
//! - `forwarder_requests_total` (counter): forwarded requests by method, status, outcome
//! - `forwarder_request_duration_seconds` (histogram): time to relay or fail
//! - `forwarder_pass_through_total` (counter): requests left to the host chain
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use axum::http::Method;
use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// How a forwarded request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The backend answered and its response was relayed.
    Relayed,
    /// The backend could not be reached; the fixed 502 was returned.
    Failed,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Relayed => "relayed",
            Outcome::Failed => "failed",
        }
    }
}

/// Start the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Label for `method`; extension methods share one bucket.
pub fn method_label(method: &Method) -> &'static str {
    match *method {
        Method::GET => "GET",
        Method::HEAD => "HEAD",
        Method::POST => "POST",
        Method::PUT => "PUT",
        Method::PATCH => "PATCH",
        Method::DELETE => "DELETE",
        Method::OPTIONS => "OPTIONS",
        Method::CONNECT => "CONNECT",
        Method::TRACE => "TRACE",
        _ => "other",
    }
}

pub fn record_forward(method: &Method, status: u16, outcome: Outcome, started: Instant) {
    let method = method_label(method);
    counter!(
        "forwarder_requests_total",
        "method" => method,
        "status" => status.to_string(),
        "outcome" => outcome.as_str()
    )
    .increment(1);

    histogram!(
        "forwarder_request_duration_seconds",
        "method" => method,
        "outcome" => outcome.as_str()
    )
    .record(started.elapsed().as_secs_f64());
}

pub fn record_pass_through() {
    counter!("forwarder_pass_through_total").increment(1);
}
