//! Structured configuration issues.
//!
//! Loading configuration never fails on a bad value that has a safe
//! fallback. Instead the loader records a [`ConfigIssue`] and the host
//! decides whether to print, log or refuse to start.

use std::fmt;

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: a default was used or the value may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// A budget violated its constraints and fell back to the default.
    InvalidBudget,
    /// An override names a tool that is not registered.
    UnknownTool,
    /// A strategy string could not be parsed.
    UnknownStrategy,
    /// `Ignore` strategy disables enforcement entirely.
    EnforcementDisabled,
    /// A payload limit of zero would reject every call.
    InvalidPayloadLimit,
}

/// A detected issue in the loaded configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    /// Dotted path of the offending key, e.g. `tools.divide.max_tokens`
    pub field: String,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn warning(
        code: ConfigIssueCode,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{} [{}]: {}", level, self.field, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_field() {
        let issue = ConfigIssue::error(
            ConfigIssueCode::InvalidPayloadLimit,
            "middleware.max_payload_bytes",
            "must be > 0",
        );
        assert!(issue.is_error());
        assert_eq!(issue.to_string(), "error [middleware.max_payload_bytes]: must be > 0");
    }

    #[test]
    fn test_warning_is_not_error() {
        let issue = ConfigIssue::warning(ConfigIssueCode::UnknownTool, "tools.nope", "not registered");
        assert!(!issue.is_error());
        assert_eq!(issue.severity, Severity::Warning);
    }
}
