//! Flight processing service.

use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

use crate::consumer::{ProcessError, Processor};
use crate::flight::types::{Flight, FlightStatus};

/// Accepts flights coming off the queue.
#[derive(Debug, Default)]
pub struct FlightService {
    processed: AtomicU64,
}

impl FlightService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of flights accepted so far.
    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::Relaxed)
    }

    fn validate(flight: &Flight) -> Result<(), ProcessError> {
        if flight.flight_number.trim().is_empty() {
            return Err(ProcessError::Rejected("flight number is empty".into()));
        }
        if flight.origin.eq_ignore_ascii_case(&flight.destination) {
            return Err(ProcessError::Rejected(format!(
                "flight {} departs and arrives at {}",
                flight.flight_number, flight.origin
            )));
        }
        Ok(())
    }
}

impl Processor<Flight> for FlightService {
    async fn process(&self, flight: Flight) -> Result<(), ProcessError> {
        Self::validate(&flight)?;

        if flight.status == FlightStatus::Cancelled {
            info!(flight = %flight.flight_number, "Flight cancelled");
        } else {
            info!(
                flight = %flight.flight_number,
                origin = %flight.origin,
                destination = %flight.destination,
                status = ?flight.status,
                "Flight processed"
            );
        }

        self.processed.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
