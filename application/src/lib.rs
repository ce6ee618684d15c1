//! Application layer for tool-governor
//!
//! This crate contains the invocation pipeline, the ports tools and adapters
//! implement, and application configuration. It depends only on the domain
//! layer.

pub mod config;
pub mod error;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::GovernorConfig;
pub use error::InvocationError;
pub use ports::{
    middleware::{MiddlewareError, MiddlewareParticipant},
    resource::{ReleaseOutcome, ReleasePolicy, ResourceError, ResourceLifecycle, ScopedResource},
    telemetry::{InvocationEvent, InvocationTelemetry, NoTelemetry},
    tool::{ErasedTool, PreparedCall, Tool, ToolFailure, erase},
};
pub use use_cases::execution_governor::{ExecutionGovernor, Invocation, InvocationOutcome};
pub use use_cases::middleware_chain::MiddlewareChain;
