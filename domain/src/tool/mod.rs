//! Tool domain module
//!
//! This module defines the core abstractions for the **Tool System**: how a
//! tool declares what it accepts and what it returns, and how failures are
//! described to the calling agent.
//!
//! # Overview
//!
//! ```text
//! ┌────────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ ToolDefinition │───▶│ ToolCall     │───▶│ ErrorRecord  │
//! │ (declared)     │    │ (coerced)    │    │ (on failure) │
//! └──────┬─────────┘    └──────────────┘    └──────────────┘
//!        │
//!        ├─ parameters:   ToolParameter + ParameterConstraints
//!        └─ result_shape: ResultShape (cost estimation input)
//! ```
//!
//! # Key Types
//!
//! - [`ToolDefinition`]: name, category, parameters, result shape
//! - [`ToolSpec`]: snapshot of the tools a host has registered
//! - [`ToolCall`]: raw arguments coerced into a JSON object
//! - [`ResultShape`] / [`DescribeShape`]: static result shape descriptors
//! - [`ToolValidator`]: aggregating structural validation
//! - [`ErrorRecord`] / [`ErrorCode`]: the uniform failure shape
//!
//! # Architecture
//!
//! - **Domain** (this module): pure definitions, no I/O
//! - **Application** (`Tool`, `ExecutionGovernor`): async invocation pipeline
//! - **Infrastructure** (`ToolRegistry`): hosting registry and built-in tools

pub mod entities;
pub mod shape;
pub mod traits;
pub mod validation;
pub mod value_objects;

pub use entities::{
    ParamType, ParameterConstraints, ToolCall, ToolCategory, ToolDefinition, ToolParameter,
    ToolSpec,
};
pub use shape::{DescribeShape, ResultShape};
pub use traits::{DefaultToolValidator, ToolValidator};
pub use validation::{ValidationError, Violation, ViolationKind};
pub use value_objects::{ErrorCode, ErrorRecord, Recovery, SuggestedAction};
