//! Domain layer for tool-governor
//!
//! Pure types and decision functions for governing tool invocations. No
//! async runtime and no I/O live here.
//!
//! # Core Concepts
//!
//! ## Tools
//!
//! A tool declares a [`ToolDefinition`]: its category, its parameters with
//! their constraints, and a static [`ResultShape`] of what it returns.
//!
//! ## Budgets
//!
//! Before a tool runs, [`CostEstimator`] predicts its token cost and
//! [`BudgetPolicy`] decides, per [`BudgetConfig`], whether to proceed.
//!
//! ## Errors
//!
//! Every failure surfaces as an [`ErrorRecord`] carrying a stable
//! [`ErrorCode`], human-readable recovery steps, and optional suggested
//! alternative tools from an [`ErrorCatalog`].

pub mod budget;
pub mod catalog;
pub mod config;
pub mod estimation;
pub mod tool;
pub mod util;

// Re-export commonly used types
pub use budget::{BudgetAssessment, BudgetConfig, BudgetDecision, BudgetPolicy, BudgetStrategy};
pub use catalog::{DefaultErrorCatalog, ErrorCatalog, ErrorContext, SuggestingErrorCatalog};
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use estimation::{CostEstimate, CostEstimator, relative_deviation};
pub use tool::{
    entities::{
        ParamType, ParameterConstraints, ToolCall, ToolCategory, ToolDefinition, ToolParameter,
        ToolSpec,
    },
    shape::{DescribeShape, ResultShape},
    traits::{DefaultToolValidator, ToolValidator},
    validation::{ValidationError, Violation, ViolationKind},
    value_objects::{ErrorCode, ErrorRecord, Recovery, SuggestedAction},
};
