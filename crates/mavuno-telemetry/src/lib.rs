//! Observability for the Mavuno auction engine.
//!
//! - Structured logging via `tracing` (JSON in production, pretty in dev)
//! - Prometheus metrics for bid arbitration, lifecycle transitions,
//!   and settlement outcomes

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::init_logging;
