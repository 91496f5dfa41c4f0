//! Tracing hooks for buffer materialization.
//!
//! Compiled to no-ops unless the `tracing` feature is enabled. Subscribers are
//! the caller's business.

#[cfg(feature = "tracing")]
pub fn emit_span(event: &str, key_values: &[(&str, String)]) {
    let span = tracing::span!(tracing::Level::TRACE, "lazyq", event);
    let _entered = span.enter();
    for (k, v) in key_values {
        tracing::trace!(%event, %k, %v, "metric");
    }
}

#[cfg(not(feature = "tracing"))]
pub fn emit_span(_event: &str, _key_values: &[(&str, String)]) { /* no-op */
}

/// Record that an operator buffered `rows` elements before yielding.
pub fn record_buffer(operator: &'static str, rows: usize) {
    emit_span("buffer", &[("operator", operator.to_string()), ("rows", rows.to_string())]);
}
