//! The request forwarder.
//!
//! # Responsibilities
//! - Pass requests without the marker to the rest of the handler chain
//! - Relay marked requests to the backend and the backend's answer back
//! - Collapse every failure into the fixed 502 response and report it
//!
//! # Design Decisions
//! - Stateless per request; the only shared piece is the upstream client
//! - No retries, no timeout beyond the transport default
//! - The backend URL is injected at construction, never read from the
//!   environment here

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::config::schema::{UpstreamConfig, DEFAULT_MARKER};
use crate::forward::error::{BuildError, ForwardError};
use crate::forward::matcher::MarkerMatcher;
use crate::forward::report::{ErrorReporter, ForwardFailure, TracingReporter};
use crate::forward::upstream::{BackendUrl, OutboundRequest};
use crate::http::response::{gateway_failure, relay_response};
use crate::observability::metrics::{self, Outcome};

/// The rest of the handler chain.
///
/// Receives the inbound request untouched when it is not forwarded.
pub trait Continuation: Send {
    fn run(self, request: Request<Body>) -> impl Future<Output = Response> + Send;
}

impl Continuation for Next {
    fn run(self, request: Request<Body>) -> impl Future<Output = Response> + Send {
        Next::run(self, request)
    }
}

/// A [`Continuation`] backed by a closure. See [`continuation_fn`].
#[derive(Debug, Clone, Copy)]
pub struct ContinuationFn<F>(F);

/// Wrap a closure as a [`Continuation`].
pub fn continuation_fn<F, Fut>(f: F) -> ContinuationFn<F>
where
    F: FnOnce(Request<Body>) -> Fut + Send,
    Fut: Future<Output = Response> + Send,
{
    ContinuationFn(f)
}

impl<F, Fut> Continuation for ContinuationFn<F>
where
    F: FnOnce(Request<Body>) -> Fut + Send,
    Fut: Future<Output = Response> + Send,
{
    fn run(self, request: Request<Body>) -> impl Future<Output = Response> + Send {
        (self.0)(request)
    }
}

/// Relays marked requests to a single backend.
pub struct Forwarder {
    backend: BackendUrl,
    matcher: MarkerMatcher,
    preserve_host: bool,
    client: reqwest::Client,
    reporter: Arc<dyn ErrorReporter>,
}

/// Builder for [`Forwarder`].
pub struct ForwarderBuilder {
    backend: BackendUrl,
    marker: String,
    preserve_host: bool,
    follow_redirects: bool,
    reporter: Arc<dyn ErrorReporter>,
}

impl ForwarderBuilder {
    pub fn marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    pub fn preserve_host(mut self, preserve: bool) -> Self {
        self.preserve_host = preserve;
        self
    }

    pub fn follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = follow;
        self
    }

    pub fn reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn build(self) -> Result<Forwarder, BuildError> {
        let redirect = if self.follow_redirects {
            reqwest::redirect::Policy::default()
        } else {
            reqwest::redirect::Policy::none()
        };

        // Proxy environment variables would silently reroute backend traffic.
        let client = reqwest::Client::builder()
            .no_proxy()
            .redirect(redirect)
            .build()
            .map_err(BuildError::Client)?;

        Ok(Forwarder {
            backend: self.backend,
            matcher: MarkerMatcher::new(self.marker),
            preserve_host: self.preserve_host,
            client,
            reporter: self.reporter,
        })
    }
}

impl Forwarder {
    /// Start building a forwarder for `backend` with default settings.
    pub fn builder(backend: BackendUrl) -> ForwarderBuilder {
        ForwarderBuilder {
            backend,
            marker: DEFAULT_MARKER.to_string(),
            preserve_host: true,
            follow_redirects: true,
            reporter: Arc::new(TracingReporter),
        }
    }

    /// Build a forwarder from the `[upstream]` configuration section.
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, BuildError> {
        let backend = BackendUrl::parse(&config.base_url)?;
        Self::builder(backend)
            .marker(config.marker.clone())
            .preserve_host(config.preserve_host)
            .follow_redirects(config.follow_redirects)
            .build()
    }

    pub fn backend(&self) -> &BackendUrl {
        &self.backend
    }

    pub fn matcher(&self) -> &MarkerMatcher {
        &self.matcher
    }

    /// Forward `request` if it carries the marker, otherwise hand it to `next`.
    pub async fn handle<C: Continuation>(&self, request: Request<Body>, next: C) -> Response {
        if !self.matcher.matches(&request) {
            metrics::record_pass_through();
            return next.run(request).await;
        }

        let started = Instant::now();
        let method = request.method().clone();
        let path = request
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| request.uri().path().to_string());

        tracing::debug!(
            method = %method,
            path = %path,
            backend = %self.backend,
            "Forwarding request"
        );

        let result = match OutboundRequest::from_inbound(request, &self.backend, self.preserve_host)
            .await
        {
            Ok(outbound) => {
                let target = outbound.target.clone();
                self.send(outbound).await.map_err(|e| (Some(target), e))
            }
            Err(e) => Err((None, e)),
        };

        let (response, outcome) = match result {
            Ok(response) => (response, Outcome::Relayed),
            Err((target, error)) => {
                self.reporter.report(&ForwardFailure {
                    method: &method,
                    path: &path,
                    target: target.as_deref(),
                    error: &error,
                });
                (gateway_failure(), Outcome::Failed)
            }
        };

        metrics::record_forward(&method, response.status().as_u16(), outcome, started);
        response
    }

    async fn send(&self, outbound: OutboundRequest) -> Result<Response, ForwardError> {
        let request = outbound.into_reqwest()?;
        let upstream = self.client.execute(request).await?;
        relay_response(upstream).await
    }
}

/// Axum middleware installing a [`Forwarder`] in front of a router.
///
/// ```ignore
/// let app = Router::new()
///     .fallback(frontend)
///     .layer(axum::middleware::from_fn_with_state(forwarder, forward_api_requests));
/// ```
pub async fn forward_api_requests(
    State(forwarder): State<Arc<Forwarder>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    forwarder.handle(request, next).await
}
