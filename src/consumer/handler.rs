//! Traced delivery handling.
//!
//! # Responsibilities
//! - Extract the publisher's trace context from the delivery headers
//! - Start one consumer span per delivery, child of that context
//! - Decode the body and hand the entity to the processor
//! - Record any failure on the span and in the log
//!
//! # Design Decisions
//! - `handle` never fails: every error, and any panic in the decoder or
//!   processor, ends at this boundary
//! - The span ends when `ConsumeSpan` drops, the only place it can end
//! - The span's context is current only inside the decode block and while
//!   the processor future is polled

use futures_util::FutureExt;
use opentelemetry::propagation::TextMapPropagator;
use opentelemetry::trace::Tracer;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use crate::consumer::codec::Decoder;
use crate::consumer::error::ConsumeError;
use crate::consumer::processor::Processor;
use crate::consumer::span::{ConsumeSpan, SpanNaming};
use crate::messaging::Delivery;
use crate::observability::metrics;
use crate::propagation::{extract_context, has_remote_parent, with_context};
use crate::resilience::ProcessingTimeout;

/// Anything that can take ownership of a delivery and deal with it.
pub trait DeliveryHandler: Send + Sync + 'static {
    fn handle(&self, delivery: Delivery) -> impl Future<Output = ()> + Send;
}

/// Consumer that traces each delivery across the messaging boundary.
///
/// Holds its collaborators for the lifetime of the process; all of them are
/// only read while handling.
pub struct TracedConsumer<T, P, D, H> {
    tracer: T,
    propagator: P,
    decoder: D,
    processor: H,
    naming: SpanNaming,
    timeout: ProcessingTimeout,
}

impl<T, P, D, H> TracedConsumer<T, P, D, H>
where
    T: Tracer + Send + Sync,
    T::Span: Send + Sync + 'static,
    P: TextMapPropagator + Send + Sync,
    D: Decoder,
    H: Processor<D::Entity>,
{
    pub fn new(tracer: T, propagator: P, decoder: D, processor: H) -> Self {
        Self {
            tracer,
            propagator,
            decoder,
            processor,
            naming: SpanNaming::default(),
            timeout: ProcessingTimeout::default(),
        }
    }

    /// Use custom span naming rules.
    pub fn with_naming(mut self, naming: SpanNaming) -> Self {
        self.naming = naming;
        self
    }

    /// Bound the processor by `timeout`.
    pub fn with_timeout(mut self, timeout: ProcessingTimeout) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn processor(&self) -> &H {
        &self.processor
    }

    /// Handle one delivery end to end.
    pub async fn consume(&self, delivery: Delivery) {
        let start = Instant::now();
        let Delivery { body, properties } = delivery;
        let message_id = properties.message_id.as_deref().unwrap_or("-");

        tracing::trace!(
            message_id = %message_id,
            queue = %properties.consumer_queue,
            bytes = body.len(),
            "Message received"
        );

        let parent = extract_context(&self.propagator, &properties.headers);
        if !has_remote_parent(&parent) {
            tracing::debug!(message_id = %message_id, "No trace context in headers, starting a new trace");
        }

        let span_name = self.naming.span_name(&properties.consumer_queue);
        let span = ConsumeSpan::start(
            &self.tracer,
            &parent,
            span_name.clone(),
            self.naming.attributes(&properties),
        );

        let outcome = match self.decode_and_process(&span, &body).await {
            Ok(()) => {
                tracing::debug!(message_id = %message_id, span = %span_name, "Message processed successfully");
                metrics::OUTCOME_PROCESSED
            }
            Err(e) => {
                tracing::error!(
                    message_id = %message_id,
                    span = %span_name,
                    error = %e,
                    "Unable to process the message"
                );
                span.record_failure(&e);
                e.outcome()
            }
        };

        drop(span);
        metrics::record_delivery(
            self.naming.queue_label(&properties.consumer_queue),
            outcome,
            start,
        );
    }

    async fn decode_and_process(&self, span: &ConsumeSpan, body: &[u8]) -> Result<(), ConsumeError> {
        let entity = {
            let _active = span.context().clone().attach();
            panic::catch_unwind(AssertUnwindSafe(|| self.decoder.decode(body)))
                .map_err(ConsumeError::from_panic)??
        };

        let processing = AssertUnwindSafe(with_context(
            span.context().clone(),
            self.processor.process(entity),
        ))
        .catch_unwind();
        self.timeout
            .run(processing)
            .await
            .map_err(ConsumeError::Timeout)?
            .map_err(ConsumeError::from_panic)??;

        Ok(())
    }
}

impl<T, P, D, H> DeliveryHandler for TracedConsumer<T, P, D, H>
where
    T: Tracer + Send + Sync + 'static,
    T::Span: Send + Sync + 'static,
    P: TextMapPropagator + Send + Sync + 'static,
    D: Decoder + 'static,
    H: Processor<D::Entity> + 'static,
{
    fn handle(&self, delivery: Delivery) -> impl Future<Output = ()> + Send {
        self.consume(delivery)
    }
}
