//! Consume span naming, attributes and lifecycle.

use opentelemetry::{
    trace::{SpanKind, Status, TraceContextExt, Tracer},
    Context, KeyValue,
};

use crate::config::TracingConfig;
use crate::consumer::error::ConsumeError;
use crate::messaging::MessageProperties;

/// Semantic attribute keys set on consume spans.
pub mod keys {
    pub const MESSAGING_SYSTEM: &str = "messaging.system";
    pub const MESSAGING_DESTINATION_KIND: &str = "messaging.destination_kind";
    pub const MESSAGING_DESTINATION: &str = "messaging.destination";
    pub const MESSAGING_PAYLOAD_SIZE: &str = "messaging.message_payload_size_bytes";
    pub const MESSAGING_OPERATION: &str = "messaging.operation";
    pub const RABBITMQ_ROUTING_KEY: &str = "rabbitmq.routing_key";

    pub const EXCEPTION_EVENT: &str = "exception";
    pub const EXCEPTION_TYPE: &str = "exception.type";
    pub const EXCEPTION_MESSAGE: &str = "exception.message";
    pub const EXCEPTION_STACKTRACE: &str = "exception.stacktrace";
}

const OPERATION: &str = "receive";

/// Rules for naming consume spans and filling their attributes.
#[derive(Debug, Clone)]
pub struct SpanNaming {
    messaging_system: String,
    generated_queue_prefix: String,
    generated_queue_label: String,
}

impl SpanNaming {
    pub fn new(
        messaging_system: impl Into<String>,
        generated_queue_prefix: impl Into<String>,
        generated_queue_label: impl Into<String>,
    ) -> Self {
        Self {
            messaging_system: messaging_system.into(),
            generated_queue_prefix: generated_queue_prefix.into(),
            generated_queue_label: generated_queue_label.into(),
        }
    }

    /// Span name for a message consumed from `queue`.
    ///
    /// Server-named queues are unbounded in number, so they all share the
    /// placeholder label.
    pub fn span_name(&self, queue: &str) -> String {
        format!("{} {OPERATION}", self.queue_label(queue))
    }

    /// `queue`, or the placeholder label when the queue is server-named.
    pub fn queue_label<'a>(&'a self, queue: &'a str) -> &'a str {
        if queue.starts_with(&self.generated_queue_prefix) {
            self.generated_queue_label.as_str()
        } else {
            queue
        }
    }

    /// Semantic attributes for a message with `properties`.
    ///
    /// Payload size is left out when the transport did not report it.
    pub fn attributes(&self, properties: &MessageProperties) -> Vec<KeyValue> {
        let mut attributes = vec![
            KeyValue::new(keys::MESSAGING_SYSTEM, self.messaging_system.clone()),
            KeyValue::new(keys::MESSAGING_DESTINATION_KIND, "queue"),
            KeyValue::new(
                keys::MESSAGING_DESTINATION,
                properties.received_exchange.clone(),
            ),
            KeyValue::new(
                keys::RABBITMQ_ROUTING_KEY,
                properties.received_routing_key.clone(),
            ),
        ];
        if let Some(length) = properties.content_length {
            attributes.push(KeyValue::new(
                keys::MESSAGING_PAYLOAD_SIZE,
                i64::try_from(length).unwrap_or(i64::MAX),
            ));
        }
        attributes.push(KeyValue::new(keys::MESSAGING_OPERATION, OPERATION));
        attributes
    }
}

impl Default for SpanNaming {
    fn default() -> Self {
        Self::from(&TracingConfig::default())
    }
}

impl From<&TracingConfig> for SpanNaming {
    fn from(config: &TracingConfig) -> Self {
        Self::new(
            config.messaging_system.clone(),
            config.generated_queue_prefix.clone(),
            config.generated_queue_label.clone(),
        )
    }
}

/// The span of one consume operation.
///
/// Only obtainable already started, and ended exactly once when dropped.
/// Holding the span inside its own context also gives the processor a
/// context whose active span is this one.
#[derive(Debug)]
pub struct ConsumeSpan {
    cx: Context,
}

impl ConsumeSpan {
    /// Start a consumer span named `name` as a child of `parent`.
    pub fn start<T>(tracer: &T, parent: &Context, name: String, attributes: Vec<KeyValue>) -> Self
    where
        T: Tracer,
        T::Span: Send + Sync + 'static,
    {
        let span = tracer
            .span_builder(name)
            .with_kind(SpanKind::Consumer)
            .with_attributes(attributes)
            .start_with_context(tracer, parent);

        Self {
            cx: parent.with_span(span),
        }
    }

    /// Context with this span active.
    pub fn context(&self) -> &Context {
        &self.cx
    }

    /// Record `err` as an exception event and mark the span failed.
    pub fn record_failure(&self, err: &ConsumeError) {
        let span = self.cx.span();
        span.add_event(
            keys::EXCEPTION_EVENT,
            vec![
                KeyValue::new(keys::EXCEPTION_TYPE, err.exception_type()),
                KeyValue::new(keys::EXCEPTION_MESSAGE, err.to_string()),
                KeyValue::new(keys::EXCEPTION_STACKTRACE, err.chain()),
            ],
        );
        span.set_status(Status::error(err.to_string()));
    }
}

impl Drop for ConsumeSpan {
    fn drop(&mut self) {
        self.cx.span().end();
    }
}
