//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (concurrency > 0, timeouts > 0)
//! - Reject empty span naming inputs
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ConsumerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use tokio::sync::Semaphore;
use url::Url;

use crate::config::schema::ConsumerConfig;

/// Upper bound on `consumer.max_concurrent_deliveries`.
///
/// The dispatcher drains by acquiring every slot in one call, which takes a `u32`,
/// and a semaphore holds at most `Semaphore::MAX_PERMITS`.
pub const MAX_CONCURRENT_DELIVERIES: usize = if Semaphore::MAX_PERMITS < u32::MAX as usize {
    Semaphore::MAX_PERMITS
} else {
    u32::MAX as usize
};

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    /// What is wrong with it.
    pub reason: String,
}

impl ValidationError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

impl std::error::Error for ValidationError {}

/// OTLP endpoints must be absolute http(s) URLs with a host.
fn check_endpoint(endpoint: &str) -> Result<(), String> {
    let url = Url::parse(endpoint).map_err(|e| format!("is not a valid URL: {}", e))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("has unsupported scheme '{}'", url.scheme()));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err("has no host".to_string());
    }
    Ok(())
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ConsumerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let required = [
        ("consumer.queue", &config.consumer.queue),
        ("tracing.service_name", &config.tracing.service_name),
        ("tracing.tracer_name", &config.tracing.tracer_name),
        ("tracing.messaging_system", &config.tracing.messaging_system),
        ("tracing.generated_queue_prefix", &config.tracing.generated_queue_prefix),
        ("tracing.generated_queue_label", &config.tracing.generated_queue_label),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            errors.push(ValidationError::new(field, "must not be empty"));
        }
    }

    if config.consumer.max_concurrent_deliveries == 0 {
        errors.push(ValidationError::new(
            "consumer.max_concurrent_deliveries",
            "must be greater than zero",
        ));
    }

    if config.consumer.processing_timeout_ms == Some(0) {
        errors.push(ValidationError::new(
            "consumer.processing_timeout_ms",
            "must be greater than zero when set",
        ));
    }

    if config.consumer.max_concurrent_deliveries > MAX_CONCURRENT_DELIVERIES {
        errors.push(ValidationError::new(
            "consumer.max_concurrent_deliveries",
            format!("must not exceed {}", MAX_CONCURRENT_DELIVERIES),
        ));
    }

    if let Some(endpoint) = &config.tracing.collector_endpoint {
        if let Err(reason) = check_endpoint(endpoint) {
            errors.push(ValidationError::new(
                "tracing.collector_endpoint",
                format!("'{}' {}", endpoint, reason),
            ));
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!(
                "'{}' is not a socket address",
                config.observability.metrics_address
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
