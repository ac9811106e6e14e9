//! Outbound request synthesis.
//!
//! # Responsibilities
//! - Validate and normalize the backend base URL
//! - Derive the outbound target from the inbound path and query
//! - Copy method, headers and (for non-GET/HEAD) the buffered body
//!
//! # Design Decisions
//! - Only the authority changes between inbound and outbound requests
//! - Framing headers the transport must recompute are dropped
//!   (`Transfer-Encoding` always, `Content-Length` when no body is sent)
//! - The whole inbound body is buffered; there is no streaming

use std::fmt;

use axum::body::{Body, Bytes};
use axum::http::header::{CONTENT_LENGTH, HOST, TRANSFER_ENCODING};
use axum::http::{HeaderMap, Method, Request, Uri};
use thiserror::Error;
use url::Url;

use crate::forward::error::ForwardError;

/// Why a backend base URL was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BackendUrlError {
    #[error("invalid backend URL {url:?}: {reason}")]
    Invalid { url: String, reason: String },

    #[error("backend URL {url:?} must use http or https, not {scheme:?}")]
    UnsupportedScheme { url: String, scheme: String },

    #[error("backend URL {0:?} must not carry a query or fragment")]
    QueryOrFragment(String),
}

/// Validated backend base URL.
///
/// Stored without a trailing slash so that appending a request path never
/// produces `//`. A path prefix is allowed and kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendUrl(String);

impl BackendUrl {
    pub fn parse(raw: &str) -> Result<Self, BackendUrlError> {
        let trimmed = raw.trim();
        let url = Url::parse(trimmed).map_err(|e| BackendUrlError::Invalid {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;

        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(BackendUrlError::UnsupportedScheme {
                    url: raw.to_string(),
                    scheme: other.to_string(),
                })
            }
        }

        if url.query().is_some() || url.fragment().is_some() {
            return Err(BackendUrlError::QueryOrFragment(raw.to_string()));
        }

        Ok(Self(trimmed.trim_end_matches('/').to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `base + path + ?query`. A bare trailing `?` is dropped.
    pub fn target_for(&self, uri: &Uri) -> String {
        let mut target = format!("{}{}", self.0, uri.path());
        if let Some(query) = uri.query().filter(|q| !q.is_empty()) {
            target.push('?');
            target.push_str(query);
        }
        target
    }
}

impl fmt::Display for BackendUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// GET and HEAD are sent without a body, whatever the client attached.
pub fn carries_body(method: &Method) -> bool {
    *method != Method::GET && *method != Method::HEAD
}

/// A request ready to be sent to the backend.
#[derive(Debug)]
pub struct OutboundRequest {
    pub method: Method,
    pub target: String,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

impl OutboundRequest {
    /// Build the outbound copy of an inbound request, buffering its body
    /// when the method carries one.
    pub async fn from_inbound(
        request: Request<Body>,
        backend: &BackendUrl,
        preserve_host: bool,
    ) -> Result<Self, ForwardError> {
        let (parts, body) = request.into_parts();
        let target = backend.target_for(&parts.uri);

        let mut headers = parts.headers;
        headers.remove(TRANSFER_ENCODING);
        if !preserve_host {
            headers.remove(HOST);
        }

        let body = if carries_body(&parts.method) {
            let bytes = axum::body::to_bytes(body, usize::MAX)
                .await
                .map_err(ForwardError::InboundBody)?;
            Some(bytes)
        } else {
            headers.remove(CONTENT_LENGTH);
            None
        };

        Ok(Self {
            method: parts.method,
            target,
            headers,
            body,
        })
    }

    /// Convert into a request the upstream client can execute.
    pub fn into_reqwest(self) -> Result<reqwest::Request, ForwardError> {
        let url = reqwest::Url::parse(&self.target).map_err(|source| {
            ForwardError::InvalidTarget {
                target: self.target.clone(),
                source,
            }
        })?;

        let mut request = reqwest::Request::new(self.method, url);
        *request.headers_mut() = self.headers;
        if let Some(body) = self.body {
            *request.body_mut() = Some(body.into());
        }
        Ok(request)
    }
}
