//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the consumer.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the flight consumer.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ConsumerConfig {
    /// Delivery handling (queue, concurrency, timeouts).
    pub consumer: DeliveryConfig,

    /// Span naming and trace export settings.
    pub tracing: TracingConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,
}

/// Delivery handling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DeliveryConfig {
    /// Queue the consumer is bound to. Used when a delivery does not name its own.
    pub queue: String,

    /// Maximum deliveries handled concurrently (backpressure).
    pub max_concurrent_deliveries: usize,

    /// Upper bound on the downstream processor, in milliseconds.
    /// Unbounded when absent.
    pub processing_timeout_ms: Option<u64>,
}

impl DeliveryConfig {
    /// Processing timeout as a `Duration`, if configured.
    pub fn processing_timeout(&self) -> Option<Duration> {
        self.processing_timeout_ms.map(Duration::from_millis)
    }
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            queue: "flight.received".to_string(),
            max_concurrent_deliveries: 16,
            processing_timeout_ms: None,
        }
    }
}

/// Tracing configuration for consume spans.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TracingConfig {
    /// Service name reported on the trace resource.
    pub service_name: String,

    /// Instrumentation scope name of the tracer.
    pub tracer_name: String,

    /// Value of the `messaging.system` span attribute.
    pub messaging_system: String,

    /// Queue name prefix the broker uses for server-named queues.
    pub generated_queue_prefix: String,

    /// Span name base used in place of server-named queues.
    pub generated_queue_label: String,

    /// OTLP gRPC collector endpoint (e.g., "http://localhost:4317").
    /// Spans are not exported when absent.
    pub collector_endpoint: Option<String>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            service_name: "flight-consumer".to_string(),
            tracer_name: "io.opentelemetry.rabbitmq".to_string(),
            messaging_system: "rabbitmq".to_string(),
            generated_queue_prefix: "amq.gen-".to_string(),
            generated_queue_label: "<generated>".to_string(),
            collector_endpoint: None,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConsumerConfig::default();
        assert_eq!(config.consumer.queue, "flight.received");
        assert_eq!(config.consumer.max_concurrent_deliveries, 16);
        assert!(config.consumer.processing_timeout().is_none());
        assert_eq!(config.tracing.generated_queue_prefix, "amq.gen-");
        assert_eq!(config.tracing.generated_queue_label, "<generated>");
        assert!(config.tracing.collector_endpoint.is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ConsumerConfig = toml::from_str(
            r#"
            [consumer]
            queue = "orders.received"
            processing_timeout_ms = 250
            "#,
        )
        .unwrap();

        assert_eq!(config.consumer.queue, "orders.received");
        assert_eq!(config.consumer.max_concurrent_deliveries, 16);
        assert_eq!(
            config.consumer.processing_timeout(),
            Some(Duration::from_millis(250))
        );
        assert_eq!(config.tracing.messaging_system, "rabbitmq");
    }
}
