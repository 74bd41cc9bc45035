//! Trace context extraction from message headers.

use opentelemetry::{
    propagation::{Extractor, TextMapPropagator},
    trace::TraceContextExt as _,
    Context,
};

use crate::messaging::Headers;

/// Reads propagation fields out of a message header table.
///
/// Brokers do not normalize header case, so a key that has no exact match
/// falls back to the first key (in map order) equal to it ignoring ASCII
/// case. Values without a text form are skipped.
#[derive(Debug, Clone, Copy)]
pub struct HeaderExtractor<'a>(pub &'a Headers);

impl Extractor for HeaderExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(|value| value.as_text())
            .or_else(|| {
                self.0
                    .iter()
                    .filter(|(name, _)| name.eq_ignore_ascii_case(key))
                    .find_map(|(_, value)| value.as_text())
            })
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }
}

/// Extract the parent context carried in `headers`.
///
/// Always starts from a fresh root context, so missing or malformed
/// propagation headers yield a root context rather than whatever happens
/// to be active on the calling thread.
pub fn extract_context<P>(propagator: &P, headers: &Headers) -> Context
where
    P: TextMapPropagator + ?Sized,
{
    propagator.extract_with_context(&Context::new(), &HeaderExtractor(headers))
}

/// Whether `cx` carries a valid remote parent.
pub fn has_remote_parent(cx: &Context) -> bool {
    let span = cx.span();
    let span_context = span.span_context();
    span_context.is_valid() && span_context.is_remote()
}
