//! Scoped activation of a trace context around a future.

use opentelemetry::Context;
use pin_project_lite::pin_project;
use std::future::Future;
use std::pin::Pin;
use std::task::{self, Poll};

pin_project! {
    /// Future that makes `cx` the current context while `inner` is polled.
    ///
    /// The context is attached at the start of every poll and detached when
    /// the poll returns, so it is never visible between polls and never
    /// leaks onto the worker thread that happens to run the task.
    pub struct WithContext<F> {
        #[pin]
        inner: F,
        cx: Context,
    }
}

impl<F: Future> Future for WithContext<F> {
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, task: &mut task::Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let _guard = this.cx.clone().attach();
        this.inner.poll(task)
    }
}

/// Run `future` with `cx` as the current context.
pub fn with_context<F: Future>(cx: Context, future: F) -> WithContext<F> {
    WithContext { inner: future, cx }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry::trace::{
        SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState,
    };

    fn remote_context() -> Context {
        Context::new().with_remote_span_context(SpanContext::new(
            TraceId::from_hex("4bf92f3577b34da6a3ce929d0e0e4736").unwrap(),
            SpanId::from_hex("00f067aa0ba902b7").unwrap(),
            TraceFlags::SAMPLED,
            true,
            TraceState::default(),
        ))
    }

    #[tokio::test]
    async fn test_context_active_only_inside_future() {
        let cx = remote_context();
        let expected = cx.span().span_context().trace_id();

        let seen = with_context(cx, async {
            tokio::task::yield_now().await;
            Context::current().span().span_context().trace_id()
        })
        .await;

        assert_eq!(seen, expected);
        assert!(!Context::current().span().span_context().is_valid());
    }
}
