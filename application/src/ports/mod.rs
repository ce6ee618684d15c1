//! Port definitions (interfaces for tools, middleware and adapters)
//!
//! Ports define the contracts that tool authors and infrastructure adapters
//! implement.

pub mod middleware;
pub mod resource;
pub mod telemetry;
pub mod tool;
