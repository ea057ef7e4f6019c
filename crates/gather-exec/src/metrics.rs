//! Tracing hooks.
//!
//! Everything here compiles to a no-op unless the `tracing` feature is on;
//! subscribers are installed by the binary layer.

use gather_core::Number;

#[cfg(feature = "tracing")]
pub fn emit_span(event: &str, key_values: &[(&str, String)]) {
    let span = tracing::trace_span!("gather", event);
    let _entered = span.enter();
    for (k, v) in key_values {
        tracing::trace!(%event, %k, %v, "metric");
    }
}

#[cfg(not(feature = "tracing"))]
pub fn emit_span(_event: &str, _key_values: &[(&str, String)]) {}

/// Element seen by an `inspect` step.
#[cfg(feature = "tracing")]
pub fn inspect_element(step: usize, label: &str, element: &Number) {
    tracing::debug!(step, label, element = %element, "inspect");
}

#[cfg(not(feature = "tracing"))]
pub fn inspect_element(_step: usize, _label: &str, _element: &Number) {}

/// Input element entering the pipeline (only with `trace_elements`).
#[cfg(feature = "tracing")]
pub fn input_element(position: u64, element: &Number) {
    tracing::trace!(position, element = %element, "input");
}

#[cfg(not(feature = "tracing"))]
pub fn input_element(_position: u64, _element: &Number) {}
