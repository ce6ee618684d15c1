//! Logging infrastructure: structured invocation telemetry.
//!
//! Provides [`JsonlTelemetryLogger`], a JSONL file writer that implements
//! the [`InvocationTelemetry`](governor_application::InvocationTelemetry) port.

mod jsonl_telemetry;

pub use jsonl_telemetry::JsonlTelemetryLogger;
