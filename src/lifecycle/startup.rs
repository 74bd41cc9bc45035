//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize subsystems from a validated configuration
//! - Start background tasks (signals, config reload, metrics)
//! - Run the dispatcher until input ends or shutdown is requested
//! - Flush telemetry on the way out
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - Consumption starts last (messages only when ready)

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::watcher::ConfigWatcher;
use crate::config::ConsumerConfig;
use crate::consumer::{JsonDecoder, SpanNaming, TracedConsumer};
use crate::dispatch::Dispatcher;
use crate::flight::{Flight, FlightService};
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::signals::spawn_signal_handler;
use crate::messaging::LineSource;
use crate::observability::{metrics, Telemetry};
use crate::resilience::ProcessingTimeout;

/// Errors that abort startup or the run loop.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("failed to build span exporter: {0}")]
    Telemetry(#[from] opentelemetry_otlp::ExporterBuildError),

    #[error("failed to watch config file: {0}")]
    Watch(#[from] notify::Error),

    #[error(transparent)]
    Source(#[from] crate::messaging::SourceError),
}

/// Run the consumer against deliveries on stdin.
///
/// `config_path` enables hot reload of the processing timeout.
pub async fn run(config: ConsumerConfig, config_path: Option<PathBuf>) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| StartupError::MetricsAddress(config.observability.metrics_address.clone()))?;
        metrics::init_metrics(addr)?;
    }

    let telemetry = Telemetry::init(&config.tracing)?;
    let timeout = ProcessingTimeout::new(config.consumer.processing_timeout());

    let consumer = TracedConsumer::new(
        telemetry.tracer(),
        telemetry.propagator(),
        JsonDecoder::<Flight>::new(),
        FlightService::new(),
    )
    .with_naming(SpanNaming::from(&config.tracing))
    .with_timeout(timeout.clone());

    let shutdown = Shutdown::new();
    spawn_signal_handler(shutdown.clone());

    // Dropping the watcher stops updates, so it lives until the run ends.
    let _watcher = match config_path {
        Some(path) => {
            let (watcher, mut updates) = ConfigWatcher::new(&path);
            let watcher = watcher.run()?;
            let timeout = timeout.clone();
            tokio::spawn(async move {
                while let Some(new_config) = updates.recv().await {
                    let limit = new_config.consumer.processing_timeout();
                    timeout.update(limit);
                    tracing::info!(processing_timeout = ?limit, "Processing timeout reloaded");
                }
            });
            Some(watcher)
        }
        None => None,
    };

    tracing::info!(
        queue = %config.consumer.queue,
        max_concurrent_deliveries = config.consumer.max_concurrent_deliveries,
        processing_timeout = ?timeout.current(),
        "Consumer started"
    );

    let consumer = Arc::new(consumer);
    let dispatcher = Dispatcher::new(consumer.clone(), config.consumer.max_concurrent_deliveries);
    let result = dispatcher
        .run(
            LineSource::stdin(config.consumer.queue.clone()),
            shutdown.subscribe(),
        )
        .await;

    tracing::info!(flights = consumer.processor().processed(), "Flights processed");
    telemetry.shutdown();

    result.map(|_| ()).map_err(StartupError::from)
}
