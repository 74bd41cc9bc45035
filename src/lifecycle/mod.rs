//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Validated config → Metrics → Telemetry → Consumer → Dispatcher
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop pulling deliveries → Drain in-flight → Flush spans → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: telemetry before the first delivery
//! - Ordered shutdown: stop pulling, drain, flush

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{Shutdown, ShutdownSignal};
pub use startup::{run, StartupError};
