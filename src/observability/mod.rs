//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Message handling produces:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges, histograms)
//!     → telemetry.rs (consume spans, exported over OTLP)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//!     → Distributed tracing collector (optional)
//! ```
//!
//! # Design Decisions
//! - Structured logging for machine parsing
//! - Trace context flows from the publisher through message headers
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
pub mod telemetry;

pub use telemetry::Telemetry;
