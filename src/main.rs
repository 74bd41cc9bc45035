//! Flight consumer.
//!
//! Consumes flight events, continuing the publisher's trace for each one.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────────────┐
//!                         │                   FLIGHT CONSUMER                     │
//!                         │                                                       │
//!     Deliveries          │  ┌──────────┐    ┌────────────┐    ┌──────────────┐   │
//!     ────────────────────┼─▶│messaging │───▶│  dispatch  │───▶│   consumer   │   │
//!                         │  │  source  │    │ (bounded)  │    │   handler    │   │
//!                         │  └──────────┘    └────────────┘    └──────┬───────┘   │
//!                         │                                          │           │
//!                         │          ┌───────────────┬───────────────┤           │
//!                         │          ▼               ▼               ▼           │
//!                         │   ┌────────────┐  ┌────────────┐  ┌────────────┐     │
//!                         │   │propagation │  │ ConsumeSpan│  │   flight   │     │
//!                         │   │ (extract)  │  │ (lifecycle)│  │  service   │     │
//!                         │   └────────────┘  └─────┬──────┘  └────────────┘     │
//!                         │                         ▼                            │
//!     Spans (OTLP)        │                  ┌────────────┐                      │
//!     ◀───────────────────┼──────────────────│ telemetry  │                      │
//!                         │                  └────────────┘                      │
//!                         └──────────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;

use flight_consumer::config::{load_config, ConsumerConfig};
use flight_consumer::lifecycle;
use flight_consumer::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "flight-consumer")]
#[command(about = "Consumes flight events with trace context propagation", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Reloaded on change.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured queue name.
    #[arg(short, long)]
    queue: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ConsumerConfig::default(),
    };
    if let Some(queue) = cli.queue {
        config.consumer.queue = queue;
    }

    init_logging(&config.observability.log_level)?;
    tracing::info!("flight-consumer v{} starting", env!("CARGO_PKG_VERSION"));

    lifecycle::run(config, cli.config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
