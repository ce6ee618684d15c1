//! Parameter validation errors and guard helpers.
//!
//! Structural validation (see [`DefaultToolValidator`](super::traits::DefaultToolValidator))
//! collects every violation before failing. The `require_*` helpers below are
//! fail-fast guards a tool uses inside its own typed validation.

use thiserror::Error;

use super::value_objects::ErrorCode;

/// Kind of a single violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// Required value missing, null or blank
    Missing,
    /// Value present but violates a constraint
    Invalid,
}

/// One violated requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub parameter: String,
    pub kind: ViolationKind,
    pub message: String,
}

impl Violation {
    pub fn missing(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            parameter: parameter.into(),
            kind: ViolationKind::Missing,
            message: message.into(),
        }
    }

    pub fn invalid(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            parameter: parameter.into(),
            kind: ViolationKind::Invalid,
            message: message.into(),
        }
    }
}

/// Aggregated validation failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", join_messages(.violations))]
pub struct ValidationError {
    violations: Vec<Violation>,
}

impl ValidationError {
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    pub fn single(violation: Violation) -> Self {
        Self {
            violations: vec![violation],
        }
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// `PARAMETER_REQUIRED` when every violation is a missing value,
    /// `VALIDATION_ERROR` otherwise.
    pub fn code(&self) -> ErrorCode {
        if !self.violations.is_empty()
            && self
                .violations
                .iter()
                .all(|v| v.kind == ViolationKind::Missing)
        {
            ErrorCode::ParameterRequired
        } else {
            ErrorCode::ValidationError
        }
    }

    /// All violation messages joined into one line.
    pub fn message(&self) -> String {
        join_messages(&self.violations)
    }
}

fn join_messages(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Fails with `PARAMETER_REQUIRED` if the text is blank.
pub fn require_non_empty(value: &str, name: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::single(Violation::missing(
            name,
            format!("Parameter '{}' is required and cannot be empty", name),
        )));
    }
    Ok(())
}

/// Fails with `PARAMETER_REQUIRED` if the value is absent.
pub fn require_some<'a, T>(value: Option<&'a T>, name: &str) -> Result<&'a T, ValidationError> {
    value.ok_or_else(|| {
        ValidationError::single(Violation::missing(
            name,
            format!("Parameter '{}' is required", name),
        ))
    })
}

pub fn require_positive<T>(value: T, name: &str) -> Result<(), ValidationError>
where
    T: PartialOrd + Default + std::fmt::Display,
{
    if value <= T::default() {
        return Err(ValidationError::single(Violation::invalid(
            name,
            format!("Parameter '{}' must be positive, got {}", name, value),
        )));
    }
    Ok(())
}

pub fn require_in_range<T>(value: T, min: T, max: T, name: &str) -> Result<(), ValidationError>
where
    T: PartialOrd + std::fmt::Display,
{
    if value < min || value > max {
        return Err(ValidationError::single(Violation::invalid(
            name,
            format!(
                "Parameter '{}' must be between {} and {}, got {}",
                name, min, max, value
            ),
        )));
    }
    Ok(())
}

pub fn require_non_empty_collection<T>(items: &[T], name: &str) -> Result<(), ValidationError> {
    if items.is_empty() {
        return Err(ValidationError::single(Violation::invalid(
            name,
            format!("Parameter '{}' must contain at least one item", name),
        )));
    }
    Ok(())
}
