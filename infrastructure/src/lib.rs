//! Infrastructure layer for tool-governor
//!
//! This crate contains adapters around the application layer: configuration
//! file loading, the hosting tool registry, built-in middleware and tools,
//! and the JSONL telemetry sink.

pub mod config;
pub mod logging;
pub mod middleware;
pub mod tools;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileBudgetConfig, FileConfig, FileMiddlewareConfig, FileTelemetryConfig,
    FileToolConfig,
};
pub use logging::JsonlTelemetryLogger;
pub use middleware::{MetricsMiddleware, PayloadGuardMiddleware, ToolMetrics, TracingMiddleware};
pub use tools::{RegistryError, ShutdownReport, ToolRegistry};
