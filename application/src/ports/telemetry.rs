//! Port for structured invocation telemetry.
//!
//! Separate from `tracing` diagnostics: tracing carries human-readable
//! operation logs, while this port captures one machine-readable record per
//! invocation (e.g. a JSONL line) for offline estimate-accuracy analysis.

use serde_json::Value;

/// A structured telemetry event.
pub struct InvocationEvent {
    /// Event type identifier (e.g., "invocation_succeeded").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl InvocationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Sink for invocation events.
///
/// `record` is synchronous and infallible so telemetry can never disturb an
/// invocation; adapters swallow their own write failures.
pub trait InvocationTelemetry: Send + Sync {
    fn record(&self, event: InvocationEvent);
}

/// No-op implementation for tests and when telemetry is disabled.
pub struct NoTelemetry;

impl InvocationTelemetry for NoTelemetry {
    fn record(&self, _event: InvocationEvent) {}
}
