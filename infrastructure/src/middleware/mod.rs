//! Built-in global middleware participants.
//!
//! | Participant | Order | Purpose |
//! |-------------|-------|---------|
//! | [`PayloadGuardMiddleware`] | -200 | Reject oversized raw parameters |
//! | [`TracingMiddleware`] | -100 | Structured start/finish/error logs |
//! | [`MetricsMiddleware`] | -50 | Per-tool counters |

mod metrics;
mod payload_guard;
mod trace;

pub use metrics::{METRICS_ORDER, MetricsMiddleware, ToolMetrics};
pub use payload_guard::{PAYLOAD_GUARD_ORDER, PAYLOAD_TOO_LARGE, PayloadGuardMiddleware};
pub use trace::{TRACING_ORDER, TracingMiddleware};
