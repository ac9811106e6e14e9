//! Failure reporting.
//!
//! The forwarder never logs directly; it hands each failure to an
//! [`ErrorReporter`]. The default reporter writes a structured `tracing`
//! event, tests plug in their own.

use axum::http::Method;

use crate::forward::error::ForwardError;

/// A forwarding attempt that ended in the 502 fallback.
#[derive(Debug)]
pub struct ForwardFailure<'a> {
    pub method: &'a Method,
    /// Inbound path and query.
    pub path: &'a str,
    /// Outbound URL, when it was built before the failure.
    pub target: Option<&'a str>,
    pub error: &'a ForwardError,
}

/// Receives forwarding failures.
pub trait ErrorReporter: Send + Sync + 'static {
    fn report(&self, failure: &ForwardFailure<'_>);
}

/// Logs failures at `error` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, failure: &ForwardFailure<'_>) {
        tracing::error!(
            method = %failure.method,
            path = %failure.path,
            target = failure.target.unwrap_or("-"),
            error = %failure.error,
            "Error forwarding request to API"
        );
    }
}
