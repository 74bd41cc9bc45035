//! Dispatcher behavior against real and scripted sources.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::BufReader;

use common::*;
use flight_consumer::consumer::DeliveryHandler;
use flight_consumer::dispatch::Dispatcher;
use flight_consumer::flight::FlightService;
use flight_consumer::lifecycle::Shutdown;
use flight_consumer::messaging::{Delivery, DeliverySource, LineSource, SourceError};

/// Handler that counts deliveries and tracks peak concurrency.
#[derive(Default)]
struct CountingHandler {
    handled: AtomicUsize,
    active: AtomicUsize,
    peak: AtomicUsize,
    delay: Duration,
}

impl CountingHandler {
    fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }
}

impl DeliveryHandler for CountingHandler {
    async fn handle(&self, _delivery: Delivery) {
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(active, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.active.fetch_sub(1, Ordering::SeqCst);
        self.handled.fetch_add(1, Ordering::SeqCst);
    }
}

/// Yields `count` deliveries, then never yields again.
struct EndlessSource {
    remaining: usize,
}

impl DeliverySource for EndlessSource {
    async fn next(&mut self) -> Result<Option<Delivery>, SourceError> {
        if self.remaining == 0 {
            std::future::pending::<()>().await;
        }
        self.remaining -= 1;
        Ok(Some(delivery("flight.received", VALID_FLIGHT)))
    }
}

fn envelopes(count: usize) -> String {
    (0..count)
        .map(|i| {
            format!(
                r#"{{"message_id": "m-{i}", "exchange": "flights", "routing_key": "flight.created", "headers": {{"traceparent": "{TRACEPARENT}"}}, "body": {VALID_FLIGHT}}}"#
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[tokio::test]
async fn test_dispatches_every_delivery_and_drains() {
    let handler = Arc::new(CountingHandler::with_delay(Duration::from_millis(5)));
    let dispatcher = Dispatcher::new(handler.clone(), 4);
    let input = envelopes(10);
    let source = LineSource::new(BufReader::new(input.as_bytes()), "flight.received");

    let shutdown = Shutdown::new();

    let report = dispatcher.run(source, shutdown.subscribe()).await.unwrap();

    assert_eq!(report.dispatched, 10);
    assert!(!report.interrupted);
    assert_eq!(handler.handled.load(Ordering::SeqCst), 10);
    assert_eq!(dispatcher.in_flight(), 0);
}

#[tokio::test]
async fn test_concurrency_is_bounded() {
    let handler = Arc::new(CountingHandler::with_delay(Duration::from_millis(20)));
    let dispatcher = Dispatcher::new(handler.clone(), 2);

    let report = dispatcher
        .run(EndlessSource { remaining: 6 }, {
            let shutdown = Shutdown::new();
            let signal = shutdown.subscribe();
            let trigger = shutdown.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(300)).await;
                trigger.trigger();
            });
            signal
        })
        .await
        .unwrap();

    assert_eq!(report.dispatched, 6);
    assert!(report.interrupted);
    assert!(handler.peak.load(Ordering::SeqCst) <= 2);
    assert_eq!(handler.handled.load(Ordering::SeqCst), 6);
}

#[tokio::test]
async fn test_shutdown_waits_for_in_flight_deliveries() {
    let handler = Arc::new(CountingHandler::with_delay(Duration::from_millis(100)));
    let dispatcher = Dispatcher::new(handler.clone(), 8);
    let shutdown = Shutdown::new();
    let signal = shutdown.subscribe();

    let trigger = shutdown.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.trigger();
    });

    let report = dispatcher
        .run(EndlessSource { remaining: 3 }, signal)
        .await
        .unwrap();

    assert!(report.interrupted);
    assert_eq!(report.dispatched, 3);
    assert_eq!(handler.handled.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_already_triggered_shutdown_dispatches_nothing() {
    let handler = Arc::new(CountingHandler::default());
    let dispatcher = Dispatcher::new(handler.clone(), 1);
    let shutdown = Shutdown::new();
    shutdown.trigger();

    let report = dispatcher
        .run(EndlessSource { remaining: 0 }, shutdown.subscribe())
        .await
        .unwrap();

    assert!(report.interrupted);
    assert_eq!(report.dispatched, 0);
}

#[tokio::test]
async fn test_traced_consumer_over_line_source() {
    let fixture = TestTracer::new();
    let consumer = Arc::new(fixture.consumer(FlightService::new()));
    let dispatcher = Dispatcher::new(consumer.clone(), 3);
    let input = format!("{}\nnot an envelope\n", envelopes(5));
    let source = LineSource::new(BufReader::new(input.as_bytes()), "flight.received");

    let shutdown = Shutdown::new();

    let report = dispatcher.run(source, shutdown.subscribe()).await.unwrap();

    assert_eq!(report.dispatched, 5);
    assert_eq!(consumer.processor().processed(), 5);
    let spans = fixture.finished_spans();
    assert_eq!(spans.len(), 5);
    assert!(spans
        .iter()
        .all(|span| span.span_context.trace_id() == trace_id()
            && span.name == "flight.received receive"));
}

#[cfg(target_pointer_width = "64")]
#[tokio::test]
async fn test_oversized_limit_still_drains() {
    let handler = Arc::new(CountingHandler::with_delay(Duration::from_millis(50)));
    let dispatcher = Dispatcher::new(handler.clone(), (1usize << 32) + 1);
    let shutdown = Shutdown::new();
    let signal = shutdown.subscribe();

    let trigger = shutdown.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        trigger.trigger();
    });

    let report = dispatcher
        .run(EndlessSource { remaining: 3 }, signal)
        .await
        .unwrap();

    assert_eq!(report.dispatched, 3);
    assert_eq!(handler.handled.load(Ordering::SeqCst), 3);
    assert_eq!(dispatcher.in_flight(), 0);
}
