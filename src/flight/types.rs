//! Flight domain types.

use serde::{Deserialize, Serialize};

/// A flight announced on the `flight.received` queue.
///
/// Published by the booking side as camelCase JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    /// Carrier code plus number, e.g. "LH400".
    pub flight_number: String,
    /// IATA code of the departure airport.
    pub origin: String,
    /// IATA code of the arrival airport.
    pub destination: String,
    /// Scheduled departure as sent by the publisher.
    #[serde(default)]
    pub departure: Option<String>,
    #[serde(default)]
    pub status: FlightStatus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlightStatus {
    #[default]
    Scheduled,
    Boarding,
    Departed,
    Delayed,
    Cancelled,
}
