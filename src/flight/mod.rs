//! Flight domain: the entity carried on the queue and the service consuming it.

pub mod service;
pub mod types;

pub use service::FlightService;
pub use types::{Flight, FlightStatus};
