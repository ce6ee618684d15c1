//! Tool domain traits
//!
//! Contains the pure structural validator. The async tool and middleware
//! traits live in the application layer (ports).

use serde_json::Value;

use super::entities::{ToolCall, ToolDefinition, ToolParameter, json_kind};
use super::validation::{ValidationError, Violation};

/// Validator for tool calls
///
/// This is a pure domain trait that validates tool calls
/// against their definitions without any I/O operations.
pub trait ToolValidator {
    /// Validate a tool call against its definition, reporting every
    /// violation at once.
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), ValidationError>;
}

/// Default implementation of ToolValidator
#[derive(Debug, Clone, Default)]
pub struct DefaultToolValidator;

impl ToolValidator for DefaultToolValidator {
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), ValidationError> {
        let mut violations = Vec::new();

        for param in &definition.parameters {
            match call.get(&param.name) {
                None | Some(Value::Null) => {
                    if param.required {
                        violations.push(Violation::missing(
                            &param.name,
                            format!(
                                "Missing required parameter '{}' for tool '{}'",
                                param.name, definition.name
                            ),
                        ));
                    }
                }
                Some(Value::String(text)) if param.required && text.trim().is_empty() => {
                    violations.push(Violation::missing(
                        &param.name,
                        format!(
                            "Required parameter '{}' for tool '{}' cannot be blank",
                            param.name, definition.name
                        ),
                    ));
                }
                Some(value) => check_value(param, value, &mut violations),
            }
        }

        // Unknown arguments are only meaningful when parameters are declared
        if !definition.parameters.is_empty() {
            for arg_name in call.arguments.keys() {
                if definition.parameter(arg_name).is_none() {
                    violations.push(Violation::invalid(
                        arg_name,
                        format!(
                            "Unknown parameter '{}' for tool '{}'",
                            arg_name, definition.name
                        ),
                    ));
                }
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(violations))
        }
    }
}

fn check_value(param: &ToolParameter, value: &Value, violations: &mut Vec<Violation>) {
    if !param.param_type.accepts(value) {
        violations.push(Violation::invalid(
            &param.name,
            format!(
                "Parameter '{}' must be of type {}, got {}",
                param.name,
                param.param_type,
                json_kind(value)
            ),
        ));
        return;
    }

    let constraints = &param.constraints;

    if let Some(number) = value.as_f64() {
        if let Some(min) = constraints.minimum
            && number < min
        {
            violations.push(Violation::invalid(
                &param.name,
                format!("Parameter '{}' must be >= {}, got {}", param.name, min, number),
            ));
        }
        if let Some(max) = constraints.maximum
            && number > max
        {
            violations.push(Violation::invalid(
                &param.name,
                format!("Parameter '{}' must be <= {}, got {}", param.name, max, number),
            ));
        }
    }

    if let Some(text) = value.as_str() {
        let length = text.chars().count();
        if let Some(min) = constraints.min_length
            && length < min
        {
            violations.push(Violation::invalid(
                &param.name,
                format!(
                    "Parameter '{}' must be at least {} characters, got {}",
                    param.name, min, length
                ),
            ));
        }
        if let Some(max) = constraints.max_length
            && length > max
        {
            violations.push(Violation::invalid(
                &param.name,
                format!(
                    "Parameter '{}' must be at most {} characters, got {}",
                    param.name, max, length
                ),
            ));
        }
        if let Some(pattern) = &constraints.pattern {
            match regex::Regex::new(pattern) {
                Ok(re) if !re.is_match(text) => violations.push(Violation::invalid(
                    &param.name,
                    format!("Parameter '{}' must match pattern '{}'", param.name, pattern),
                )),
                Ok(_) => {}
                Err(e) => violations.push(Violation::invalid(
                    &param.name,
                    format!(
                        "Parameter '{}' declares an invalid pattern '{}': {}",
                        param.name, pattern, e
                    ),
                )),
            }
        }
    }

    if let Some(items) = value.as_array()
        && let Some(min_items) = constraints.min_items
        && items.len() < min_items
    {
        violations.push(Violation::invalid(
            &param.name,
            format!(
                "Parameter '{}' must contain at least {} item(s), got {}",
                param.name,
                min_items,
                items.len()
            ),
        ));
    }
}
