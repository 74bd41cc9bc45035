//! Message consumer subsystem.
//!
//! # Data Flow
//! ```text
//! Delivery
//!     → propagation (parent context from headers)
//!     → span.rs (ConsumeSpan: name, kind CONSUMER, semantic attributes)
//!     → codec.rs (body → entity)
//!     → processor.rs (entity → business logic)
//!     → failure recorded on span (exception event + ERROR status)
//!     → span ends when dropped
//! ```
//!
//! # Design Decisions
//! - Decode and process failures are treated the same way
//! - Success leaves the span status unset
//! - Ack/nack is the transport's decision, never derived from span status

pub mod codec;
pub mod error;
pub mod handler;
pub mod processor;
pub mod span;

pub use codec::{Decoder, JsonDecoder};
pub use error::{BoxError, ConsumeError, DecodeError, ProcessError};
pub use handler::{DeliveryHandler, TracedConsumer};
pub use processor::{processor_fn, Processor, ProcessorFn};
pub use span::{ConsumeSpan, SpanNaming};
