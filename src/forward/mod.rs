//! Request forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → matcher.rs (marker substring in the effective URL?)
//!         no  → Continuation (host framework handles it, untouched)
//!         yes → upstream.rs (backend URL + path + query, headers, body)
//!             → reqwest client (single outbound call)
//!             → http::response (relay status, reason, headers, body)
//!             → on failure: report.rs + fixed 502
//! ```

pub mod error;
pub mod forwarder;
pub mod matcher;
pub mod report;
pub mod upstream;

pub use error::{BuildError, ForwardError};
pub use forwarder::{
    continuation_fn, forward_api_requests, Continuation, ContinuationFn, Forwarder,
    ForwarderBuilder,
};
pub use matcher::{effective_url, MarkerMatcher};
pub use report::{ErrorReporter, ForwardFailure, TracingReporter};
pub use upstream::{BackendUrl, BackendUrlError, OutboundRequest};
