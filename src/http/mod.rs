//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum host router, middleware wiring)
//!     → forward middleware (marker check)
//!         → host routes (health, static assets, 404)
//!         → backend relay → response.rs (relay or 502)
//!     → Send to client
//! ```

pub mod response;
pub mod server;

pub use response::{gateway_failure, relay_response, GATEWAY_FAILURE_MESSAGE};
pub use server::HttpServer;
