//! Trace context propagation subsystem.
//!
//! # Data Flow
//! ```text
//! Delivery headers
//!     → extractor.rs (HeaderExtractor + W3C propagator)
//!     → parent Context (remote span context, or root)
//!     → scope.rs (context current only while the handler runs)
//! ```
//!
//! # Design Decisions
//! - Extraction never fails; bad headers mean a new root trace
//! - The propagator is injected, not looked up globally
//! - Activation is scoped: attached per poll or per block, always restored

pub mod extractor;
pub mod scope;

pub use extractor::{extract_context, has_remote_parent, HeaderExtractor};
pub use scope::{with_context, WithContext};
