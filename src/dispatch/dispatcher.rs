//! Concurrent delivery dispatch with backpressure.
//!
//! # Responsibilities
//! - Pull deliveries from a source
//! - Run each delivery on its own task
//! - Enforce `max_concurrent_deliveries` via semaphore
//! - Drain in-flight deliveries on shutdown or end of input

use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::config::validation::MAX_CONCURRENT_DELIVERIES;
use crate::consumer::DeliveryHandler;
use crate::lifecycle::ShutdownSignal;
use crate::messaging::{DeliverySource, SourceError};
use crate::observability::metrics;

/// Summary of a dispatcher run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchReport {
    /// Deliveries handed to the handler.
    pub dispatched: u64,
    /// Whether the run ended because of a shutdown signal.
    pub interrupted: bool,
}

/// Hands deliveries to a handler, one task per delivery.
///
/// A delivery is only pulled from the source once a slot is free, so a
/// slow handler slows consumption instead of piling up tasks.
pub struct Dispatcher<H> {
    handler: Arc<H>,
    slots: Arc<Semaphore>,
    max_in_flight: usize,
}

impl<H: DeliveryHandler> Dispatcher<H> {
    /// `max_in_flight` is clamped to `1..=MAX_CONCURRENT_DELIVERIES`.
    pub fn new(handler: Arc<H>, max_in_flight: usize) -> Self {
        let max_in_flight = max_in_flight.clamp(1, MAX_CONCURRENT_DELIVERIES);
        Self {
            handler,
            slots: Arc::new(Semaphore::new(max_in_flight)),
            max_in_flight,
        }
    }

    /// Deliveries currently being handled.
    pub fn in_flight(&self) -> usize {
        self.max_in_flight - self.slots.available_permits()
    }

    /// Dispatch until the source is exhausted or shutdown is signalled,
    /// then wait for in-flight deliveries to finish.
    pub async fn run<S: DeliverySource>(
        &self,
        mut source: S,
        mut shutdown: ShutdownSignal,
    ) -> Result<DispatchReport, SourceError> {
        let mut report = DispatchReport {
            dispatched: 0,
            interrupted: false,
        };

        let result = loop {
            let permit = tokio::select! {
                _ = shutdown.recv() => {
                    report.interrupted = true;
                    break Ok(());
                }
                permit = self.slots.clone().acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break Ok(()),
                },
            };

            let delivery = tokio::select! {
                _ = shutdown.recv() => {
                    report.interrupted = true;
                    break Ok(());
                }
                next = source.next() => match next {
                    Ok(Some(delivery)) => delivery,
                    Ok(None) => break Ok(()),
                    Err(e) => break Err(e),
                },
            };

            report.dispatched += 1;
            let handler = self.handler.clone();
            let slots = self.slots.clone();
            let max_in_flight = self.max_in_flight;
            metrics::set_in_flight(self.in_flight());

            tokio::spawn(async move {
                handler.handle(delivery).await;
                drop(permit);
                metrics::set_in_flight(max_in_flight - slots.available_permits());
            });
        };

        self.drain().await;
        tracing::info!(
            dispatched = report.dispatched,
            interrupted = report.interrupted,
            "Dispatcher stopped"
        );

        result.map(|()| report)
    }

    /// Wait until every slot is free again.
    async fn drain(&self) {
        if self.in_flight() > 0 {
            tracing::info!(in_flight = self.in_flight(), "Draining in-flight deliveries");
        }
        // Held permits come back as tasks finish; the semaphore is never closed.
        let all = u32::try_from(self.max_in_flight).unwrap_or(u32::MAX);
        let _all = self.slots.acquire_many(all).await;
    }
}
