//! Marker matching.
//!
//! # Design Decisions
//! - Literal substring check, no prefix or segment semantics: `/api` alone
//!   does not match, `/page?next=/api/x` does
//! - Checked against the absolute URL the client addressed, so the query
//!   string and authority take part in the match
//! - Case-sensitive

use axum::http::{header::HOST, Request};

/// Decides whether a request is bound for the backend.
#[derive(Debug, Clone)]
pub struct MarkerMatcher {
    marker: String,
}

impl MarkerMatcher {
    /// Create a matcher for the given literal marker.
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Returns true if the request's effective URL contains the marker.
    pub fn matches<B>(&self, req: &Request<B>) -> bool {
        effective_url(req).contains(&self.marker)
    }
}

/// Reconstruct the absolute URL of a request.
///
/// Servers usually see origin-form targets (`/path?query`); the scheme
/// defaults to `http` and the authority comes from the `Host` header. When
/// neither the URI nor the headers name an authority only the path and query
/// are returned.
pub fn effective_url<B>(req: &Request<B>) -> String {
    let uri = req.uri();
    let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");

    let authority = uri
        .authority()
        .map(|a| a.as_str())
        .or_else(|| req.headers().get(HOST).and_then(|h| h.to_str().ok()));

    match authority {
        Some(authority) => {
            let scheme = uri.scheme_str().unwrap_or("http");
            format!("{scheme}://{authority}{path_and_query}")
        }
        None => path_and_query.to_string(),
    }
}
