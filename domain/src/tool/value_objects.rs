//! Tool domain value objects: the uniform failure shape
//!
//! Every failed invocation is described by exactly one [`ErrorRecord`].
//! Callers distinguish failures by [`ErrorCode`], never by Rust type:
//!
//! | Code | Raised when |
//! |------|-------------|
//! | `PARAMETER_REQUIRED` | A required parameter is missing or blank |
//! | `VALIDATION_ERROR` | A declared constraint is violated or params cannot be coerced |
//! | `TOOL_ERROR` | The tool body (or a pre-hook) failed |
//! | `TIMEOUT` | The tool body reported a timeout |
//! | `RESOURCE_LIMIT_EXCEEDED` | The budget policy aborted the call |
//! | `TOOL_NOT_FOUND` | The host has no tool with the requested name |
//! | `ALREADY_RELEASED` | The tool's scoped resources were already released |
//! | *domain code* | A tool or middleware reported its own code |
//!
//! Cancellation has no code: it is never coerced into a record.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Error code carried by an [`ErrorRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ParameterRequired,
    ValidationError,
    ToolError,
    Timeout,
    ResourceLimitExceeded,
    ToolNotFound,
    AlreadyReleased,
    /// Tool-declared code, e.g. `FILE_NOT_FOUND`
    Domain(String),
}

impl ErrorCode {
    pub fn as_str(&self) -> &str {
        match self {
            ErrorCode::ParameterRequired => "PARAMETER_REQUIRED",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::ToolError => "TOOL_ERROR",
            ErrorCode::Timeout => "TIMEOUT",
            ErrorCode::ResourceLimitExceeded => "RESOURCE_LIMIT_EXCEEDED",
            ErrorCode::ToolNotFound => "TOOL_NOT_FOUND",
            ErrorCode::AlreadyReleased => "ALREADY_RELEASED",
            ErrorCode::Domain(code) => code.as_str(),
        }
    }

    /// Parse a code string, mapping unknown codes to [`ErrorCode::Domain`].
    pub fn parse(code: &str) -> Self {
        match code {
            "PARAMETER_REQUIRED" => ErrorCode::ParameterRequired,
            "VALIDATION_ERROR" => ErrorCode::ValidationError,
            "TOOL_ERROR" => ErrorCode::ToolError,
            "TIMEOUT" => ErrorCode::Timeout,
            "RESOURCE_LIMIT_EXCEEDED" => ErrorCode::ResourceLimitExceeded,
            "TOOL_NOT_FOUND" => ErrorCode::ToolNotFound,
            "ALREADY_RELEASED" => ErrorCode::AlreadyReleased,
            other => ErrorCode::Domain(other.to_string()),
        }
    }

    pub fn is_domain(&self) -> bool {
        matches!(self, ErrorCode::Domain(_))
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ErrorCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Ok(ErrorCode::parse(&code))
    }
}

/// Ordered recovery advice attached to a failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recovery {
    pub steps: Vec<String>,
}

impl Recovery {
    pub fn new(steps: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            steps: steps.into_iter().map(Into::into).collect(),
        }
    }
}

/// A concrete follow-up the caller could try instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedAction {
    /// Name of the tool to try
    pub tool: String,
    /// Why it may help
    pub description: String,
    /// Suggested arguments
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub parameters: Value,
}

impl SuggestedAction {
    pub fn new(tool: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            description: description.into(),
            parameters: Value::Null,
        }
    }

    pub fn with_parameters(mut self, parameters: Value) -> Self {
        self.parameters = parameters;
        self
    }
}

/// Uniform description of a failed invocation.
///
/// Created fresh per failure by an
/// [`ErrorCatalog`](crate::catalog::ErrorCatalog); never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub code: ErrorCode,
    /// Name of the tool the failure belongs to
    pub tool_name: String,
    /// Human-readable message
    pub message: String,
    /// Underlying cause, when one is known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub recovery: Recovery,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggested_actions: Vec<SuggestedAction>,
}

impl ErrorRecord {
    pub fn new(code: ErrorCode, tool_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            tool_name: tool_name.into(),
            message: message.into(),
            detail: None,
            recovery: Recovery::default(),
            suggested_actions: Vec::new(),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_recovery(mut self, recovery: Recovery) -> Self {
        self.recovery = recovery;
        self
    }

    pub fn with_suggestion(mut self, action: SuggestedAction) -> Self {
        self.suggested_actions.push(action);
        self
    }
}

impl std::fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(detail) = &self.detail {
            write!(f, " ({})", detail)?;
        }
        Ok(())
    }
}

impl std::error::Error for ErrorRecord {}
