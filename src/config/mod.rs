//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults
//!     → loader.rs (optional TOML file, API_SERVER_URL, CLI overrides)
//!     → validation.rs (semantic checks)
//!     → ForwarderConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Resolved once at startup; the forwarder receives the backend URL as a
//!   constructor argument and never reads the environment itself
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError, ConfigOverrides, BACKEND_URL_ENV};
pub use schema::{
    ForwarderConfig, HostConfig, ListenerConfig, LogFormat, ObservabilityConfig, UpstreamConfig,
};
pub use validation::ValidationError;
