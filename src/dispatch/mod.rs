//! Dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! DeliverySource
//!     → dispatcher.rs (wait for a free slot, pull next delivery)
//!     → tokio::spawn (one task per delivery)
//!     → DeliveryHandler::handle (traced consume)
//!     → slot released when the handler returns
//! ```
//!
//! # Design Decisions
//! - Bounded concurrency prevents resource exhaustion
//! - Deliveries never share state; each task owns its delivery
//! - Shutdown stops pulling, then drains what is in flight

pub mod dispatcher;

pub use dispatcher::{DispatchReport, Dispatcher};
