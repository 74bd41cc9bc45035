//! Downstream processing entry point.

use std::future::Future;

use crate::consumer::error::ProcessError;

/// Business logic that receives decoded entities.
///
/// Takes ownership of the entity; the handler keeps nothing of it.
pub trait Processor<E>: Send + Sync {
    fn process(&self, entity: E) -> impl Future<Output = Result<(), ProcessError>> + Send;
}

/// Processor backed by an async closure. See [`processor_fn`].
#[derive(Clone)]
pub struct ProcessorFn<F> {
    f: F,
}

/// Wrap `f` as a [`Processor`].
pub fn processor_fn<F>(f: F) -> ProcessorFn<F> {
    ProcessorFn { f }
}

impl<E, F, Fut> Processor<E> for ProcessorFn<F>
where
    F: Fn(E) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), ProcessError>> + Send,
{
    fn process(&self, entity: E) -> impl Future<Output = Result<(), ProcessError>> + Send {
        (self.f)(entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_processor_fn() {
        let processor = processor_fn(|n: u32| async move {
            if n % 2 == 0 {
                Ok(())
            } else {
                Err(ProcessError::Rejected(format!("{n} is odd")))
            }
        });

        assert!(processor.process(2).await.is_ok());
        let err = processor.process(3).await.unwrap_err();
        assert_eq!(err.to_string(), "entity rejected: 3 is odd");
    }
}
