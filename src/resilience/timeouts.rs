//! Timeout enforcement for downstream processing.
//!
//! # Responsibilities
//! - Hold the current processing deadline, swappable at runtime
//! - Wrap processor futures with that deadline
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from processor errors
//! - No deadline configured means the processor runs unbounded

use arc_swap::ArcSwapOption;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Shared, hot-swappable processing deadline.
#[derive(Debug, Clone, Default)]
pub struct ProcessingTimeout {
    current: Arc<ArcSwapOption<Duration>>,
}

impl ProcessingTimeout {
    pub fn new(limit: Option<Duration>) -> Self {
        Self {
            current: Arc::new(ArcSwapOption::from(limit.map(Arc::new))),
        }
    }

    /// Deadline applied to the next processing call.
    pub fn current(&self) -> Option<Duration> {
        self.current.load_full().map(|limit| *limit)
    }

    /// Replace the deadline. In-flight calls keep the one they started with.
    pub fn update(&self, limit: Option<Duration>) {
        self.current.store(limit.map(Arc::new));
    }

    /// Run `future` under the current deadline.
    ///
    /// Returns the elapsed deadline as the error when it expires first.
    pub async fn run<F: Future>(&self, future: F) -> Result<F::Output, Duration> {
        match self.current() {
            Some(limit) => tokio::time::timeout(limit, future)
                .await
                .map_err(|_| limit),
            None => Ok(future.await),
        }
    }
}
