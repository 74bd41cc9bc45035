//! Traced message-queue consumer library.

pub mod config;
pub mod consumer;
pub mod dispatch;
pub mod flight;
pub mod lifecycle;
pub mod messaging;
pub mod observability;
pub mod propagation;
pub mod resilience;

pub use config::ConsumerConfig;
pub use consumer::TracedConsumer;
pub use lifecycle::Shutdown;
pub use messaging::Delivery;
