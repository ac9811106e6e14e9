//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! forwarder / server
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters and histograms via the metrics facade)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → Prometheus scrape endpoint (opt-in)
//! ```

pub mod logging;
pub mod metrics;
