//! Structured logging.
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - `RUST_LOG` wins over the configured level when set

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter for a configured base level.
///
/// Keeps the exporter stack quiet unless explicitly asked for.
pub fn default_filter(level: &str) -> String {
    format!("{level},h2=warn,tonic=warn,hyper=warn,opentelemetry=warn")
}

/// Install the global log subscriber.
pub fn init_logging(level: &str) -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(level).into()))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}
