//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Decoded entity handed to the processor:
//!     → timeouts.rs (enforce the processing deadline, if any)
//!     → On expiry: handler records a timeout failure on the span
//! ```
//!
//! # Design Decisions
//! - A hung processor must not pin a delivery slot forever
//! - No retries here; redelivery belongs to the broker

pub mod timeouts;

pub use timeouts::ProcessingTimeout;
