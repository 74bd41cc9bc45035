//! OpenTelemetry tracer provider setup.
//!
//! # Responsibilities
//! - Build the process-wide tracer provider once at startup
//! - Export spans over OTLP when a collector is configured
//! - Flush and shut the provider down on exit
//!
//! # Design Decisions
//! - The provider is passed around explicitly, never registered globally
//! - No collector configured: spans are created and dropped locally

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::{ExporterBuildError, SpanExporter, WithExportConfig};
use opentelemetry_sdk::{
    propagation::TraceContextPropagator,
    trace::{SdkTracer, SdkTracerProvider},
    Resource,
};

use crate::config::TracingConfig;

/// Tracing handles owned by the process for its whole lifetime.
pub struct Telemetry {
    provider: SdkTracerProvider,
    tracer_name: String,
}

impl Telemetry {
    /// Build the tracer provider described by `config`.
    pub fn init(config: &TracingConfig) -> Result<Self, ExporterBuildError> {
        let resource = Resource::builder()
            .with_service_name(config.service_name.clone())
            .build();
        let mut builder = SdkTracerProvider::builder().with_resource(resource);

        match &config.collector_endpoint {
            Some(endpoint) => {
                let exporter = SpanExporter::builder()
                    .with_tonic()
                    .with_endpoint(endpoint.clone())
                    .build()?;
                builder = builder.with_batch_exporter(exporter);
                tracing::info!(endpoint = %endpoint, "Exporting spans over OTLP");
            }
            None => {
                tracing::info!("No collector endpoint configured, spans are not exported");
            }
        }

        Ok(Self {
            provider: builder.build(),
            tracer_name: config.tracer_name.clone(),
        })
    }

    /// Tracer for consume spans.
    pub fn tracer(&self) -> SdkTracer {
        self.provider.tracer(self.tracer_name.clone())
    }

    /// Propagator used to read trace context from message headers.
    pub fn propagator(&self) -> TraceContextPropagator {
        TraceContextPropagator::new()
    }

    /// Flush pending spans and stop exporting.
    pub fn shutdown(self) {
        if let Err(e) = self.provider.shutdown() {
            tracing::warn!(error = %e, "Tracer provider shutdown failed");
        }
    }
}
