//! Metrics collection and exposition.
//!
//! # Metrics
//! - `consumer_messages_total` (counter): handled deliveries by queue, outcome
//! - `consumer_processing_duration_seconds` (histogram): handling latency by queue
//! - `consumer_in_flight` (gauge): deliveries currently being handled
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; a no-op until an exporter is installed
//! - Queue label is the span name base (server-named queues share one
//!   placeholder), so generated queues do not explode cardinality

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Outcome label for a delivery handled without error.
pub const OUTCOME_PROCESSED: &str = "processed";

/// Install the Prometheus exporter with its own HTTP listener.
///
/// Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint started");
    Ok(())
}

/// Record one handled delivery.
pub fn record_delivery(queue: &str, outcome: &'static str, start: Instant) {
    metrics::counter!(
        "consumer_messages_total",
        "queue" => queue.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!(
        "consumer_processing_duration_seconds",
        "queue" => queue.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Set the number of deliveries currently in flight.
pub fn set_in_flight(count: usize) {
    metrics::gauge!("consumer_in_flight").set(count as f64);
}
