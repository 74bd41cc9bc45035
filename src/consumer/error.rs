//! Failure types for message handling.

use std::any::Any;
use std::error::Error as StdError;
use std::time::Duration;
use thiserror::Error;

/// Boxed error for processors that fail with arbitrary errors.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// The message body could not be turned into an entity.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Body is empty.
    #[error("message body is empty")]
    Empty,

    /// Body is not valid JSON for the entity.
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// The downstream processor failed.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The entity was understood but refused.
    #[error("entity rejected: {0}")]
    Rejected(String),

    /// Any other processor failure.
    #[error(transparent)]
    Other(#[from] BoxError),
}

/// Why handling a single delivery failed.
///
/// Never escapes the handler; it only ends up on the span and in the log.
#[derive(Debug, Error)]
pub enum ConsumeError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error("processing timed out after {0:?}")]
    Timeout(Duration),

    /// Decoder or processor panicked; holds the panic message.
    #[error("processing panicked: {0}")]
    Panic(String),
}

impl ConsumeError {
    /// Value of the `exception.type` event attribute.
    pub fn exception_type(&self) -> &'static str {
        match self {
            ConsumeError::Decode(_) => std::any::type_name::<DecodeError>(),
            ConsumeError::Process(_) => std::any::type_name::<ProcessError>(),
            ConsumeError::Timeout(_) => std::any::type_name::<tokio::time::error::Elapsed>(),
            ConsumeError::Panic(_) => "panic",
        }
    }

    /// Outcome label for metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            ConsumeError::Decode(_) => "decode_error",
            ConsumeError::Process(_) => "process_error",
            ConsumeError::Timeout(_) => "timeout",
            ConsumeError::Panic(_) => "panic",
        }
    }

    /// The error and its source chain, one cause per line.
    ///
    /// Stands in for a stack trace on the `exception.stacktrace` attribute.
    pub fn chain(&self) -> String {
        let mut out = format!("{}: {}", self.exception_type(), self);
        let mut source = self.source();
        while let Some(cause) = source {
            out.push_str("\ncaused by: ");
            out.push_str(&cause.to_string());
            source = cause.source();
        }
        out
    }
}

impl ConsumeError {
    /// Build a `Panic` from a payload caught by `catch_unwind`.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        ConsumeError::Panic(message)
    }
}
