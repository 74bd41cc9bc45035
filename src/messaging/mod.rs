//! Messaging subsystem.
//!
//! # Data Flow
//! ```text
//! Broker / replay input
//!     → source.rs (DeliverySource: one Delivery per message)
//!     → delivery.rs (body + MessageProperties, immutable)
//!     → handed to the dispatcher, consumed once by a handler
//! ```
//!
//! # Design Decisions
//! - The transport is behind a trait; acknowledgement and redelivery stay there
//! - Header values keep their type; only text values are used for propagation
//! - Content length is optional and never defaulted to zero

pub mod delivery;
pub mod source;

pub use delivery::{Delivery, HeaderValue, Headers, MessageProperties};
pub use source::{DeliverySource, LineSource, SourceError};
