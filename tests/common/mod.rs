//! Shared fixtures for integration tests.
#![allow(dead_code)]

use opentelemetry::trace::{SpanId, TraceId, TracerProvider as _};
use opentelemetry::{KeyValue, Value};
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::{InMemorySpanExporter, SdkTracer, SdkTracerProvider, SpanData};

use flight_consumer::consumer::{JsonDecoder, Processor, TracedConsumer};
use flight_consumer::flight::Flight;
use flight_consumer::messaging::Delivery;

pub const TRACE_ID: &str = "0af7651916cd43dd8448eb211c80319c";
pub const PARENT_SPAN_ID: &str = "b7ad6b7169203331";
pub const TRACEPARENT: &str = "00-0af7651916cd43dd8448eb211c80319c-b7ad6b7169203331-01";

pub const VALID_FLIGHT: &str =
    r#"{"flightNumber": "LH400", "origin": "FRA", "destination": "JFK", "status": "BOARDING"}"#;
pub const REJECTED_FLIGHT: &str = r#"{"flightNumber": "", "origin": "FRA", "destination": "JFK"}"#;

/// Tracer whose finished spans land in memory as soon as they end.
pub struct TestTracer {
    pub provider: SdkTracerProvider,
    pub exporter: InMemorySpanExporter,
}

impl TestTracer {
    pub fn new() -> Self {
        let exporter = InMemorySpanExporter::default();
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(exporter.clone())
            .build();
        Self { provider, exporter }
    }

    pub fn tracer(&self) -> SdkTracer {
        self.provider.tracer("io.opentelemetry.rabbitmq")
    }

    pub fn finished_spans(&self) -> Vec<SpanData> {
        self.exporter.get_finished_spans().unwrap()
    }

    /// Consumer of flights wired to this tracer.
    pub fn consumer<H: Processor<Flight>>(
        &self,
        processor: H,
    ) -> TracedConsumer<SdkTracer, TraceContextPropagator, JsonDecoder<Flight>, H> {
        TracedConsumer::new(
            self.tracer(),
            TraceContextPropagator::new(),
            JsonDecoder::new(),
            processor,
        )
    }
}

pub fn trace_id() -> TraceId {
    TraceId::from_hex(TRACE_ID).unwrap()
}

pub fn parent_span_id() -> SpanId {
    SpanId::from_hex(PARENT_SPAN_ID).unwrap()
}

/// Delivery from `flights` / `flight.created` onto `queue`.
pub fn delivery(queue: &str, body: &str) -> Delivery {
    Delivery::new(queue, body.as_bytes().to_vec())
        .with_route("flights", "flight.created")
        .with_content_length(body.len() as u64)
}

/// Same as [`delivery`], carrying the test trace context.
pub fn traced_delivery(queue: &str, body: &str) -> Delivery {
    delivery(queue, body).with_header("traceparent", TRACEPARENT)
}

pub fn attribute<'a>(span: &'a SpanData, key: &str) -> Option<&'a Value> {
    span.attributes
        .iter()
        .find(|kv: &&KeyValue| kv.key.as_str() == key)
        .map(|kv| &kv.value)
}
