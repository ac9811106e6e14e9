//! Forwarding errors.

use thiserror::Error;

use crate::forward::upstream::BackendUrlError;

/// Everything that can stop a marked request from reaching the backend.
///
/// Every variant is answered with the same 502 payload; the variants exist
/// for the error reporter, not for the client.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("failed to read inbound request body: {0}")]
    InboundBody(#[source] axum::Error),

    #[error("invalid outbound target {target:?}: {source}")]
    InvalidTarget {
        target: String,
        #[source]
        source: url::ParseError,
    },

    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Errors constructing a [`Forwarder`](crate::forward::Forwarder).
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Backend(#[from] BackendUrlError),

    #[error("failed to build upstream client: {0}")]
    Client(#[source] reqwest::Error),
}
