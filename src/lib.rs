//! API request forwarder.
//!
//! An axum middleware that relays every request whose URL contains `/api/`
//! to a configured backend and hands everything else to the host router.

pub mod config;
pub mod forward;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::ForwarderConfig;
pub use forward::Forwarder;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
