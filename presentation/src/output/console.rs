//! Console output formatter for invocation results

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use governor_application::{InvocationError, InvocationOutcome};
use governor_domain::{BudgetDecision, ConfigIssue, OutputFormat, Severity, ToolSpec};
use serde_json::{Value, json};

/// Formats invocation results for console display
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleFormatter {
    format: OutputFormat,
}

impl ConsoleFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn output_format(&self) -> OutputFormat {
        self.format
    }

    /// Format a successful invocation as a colored summary
    pub fn pretty_outcome(outcome: &InvocationOutcome) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{} {} {}\n",
            "✓".green().bold(),
            outcome.tool_name.bold(),
            format!("({} ms)", outcome.elapsed_ms).dimmed()
        ));
        output.push_str(&Self::indent(&Self::pretty_value(&outcome.value), "  "));
        output.push('\n');

        let budget = format!(
            "tokens: ~{} estimated, ~{} actual, decision: {}",
            outcome.estimated_tokens,
            outcome.actual_tokens,
            outcome.budget_decision.as_str()
        );
        match outcome.budget_decision {
            BudgetDecision::Proceed => output.push_str(&format!("{}\n", budget.dimmed())),
            _ => output.push_str(&format!("{}\n", budget.yellow())),
        }
        if outcome.truncate_signal {
            output.push_str(&format!(
                "{}\n",
                "Result exceeds the token budget; consider narrowing the request".yellow()
            ));
        }

        output
    }

    /// Format a failure with its recovery steps and suggestions
    pub fn pretty_error(error: &InvocationError) -> String {
        let record = match error {
            InvocationError::Cancelled { tool_name } => {
                return format!(
                    "{} {}\n",
                    "⊘".yellow().bold(),
                    format!("'{}' was cancelled", tool_name).yellow()
                );
            }
            InvocationError::Failed(record) => record,
        };

        let mut output = format!(
            "{} {} {}\n",
            "✗".red().bold(),
            format!("[{}]", record.code).red().bold(),
            record.message
        );
        if let Some(detail) = &record.detail {
            output.push_str(&format!("  {} {}\n", "Cause:".bold(), detail));
        }

        if !record.recovery.steps.is_empty() {
            output.push_str(&format!("\n{}\n", "Recovery:".cyan().bold()));
            for (i, step) in record.recovery.steps.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, step));
            }
        }

        if !record.suggested_actions.is_empty() {
            output.push_str(&format!("\n{}\n", "Suggested tools:".green().bold()));
            for action in &record.suggested_actions {
                output.push_str(&format!("  * {}", action.tool.bold()));
                if !action.description.is_empty() {
                    output.push_str(&format!(" - {}", action.description));
                }
                output.push('\n');
            }
        }

        output
    }

    /// Format the tool listing
    pub fn pretty_tools(tools: &ToolSpec) -> String {
        if tools.is_empty() {
            return format!("{}\n", "No tools registered".dimmed());
        }

        let mut output = format!("{}\n", "Registered tools:".cyan().bold());
        for tool in tools.all() {
            output.push_str(&format!(
                "\n  {} {}\n    {}\n",
                tool.name.bold(),
                format!("[{}]", tool.category).dimmed(),
                tool.description
            ));
            for param in &tool.parameters {
                let marker = if param.required { "*" } else { " " };
                output.push_str(&format!(
                    "    {}{}: {} - {}\n",
                    marker.red(),
                    param.name,
                    param.param_type,
                    param.description
                ));
            }
        }
        output
    }

    /// Format configuration issues, errors first
    pub fn pretty_issues(issues: &[ConfigIssue]) -> String {
        let mut sorted: Vec<&ConfigIssue> = issues.iter().collect();
        sorted.sort_by_key(|issue| !issue.is_error());

        sorted
            .into_iter()
            .map(|issue| {
                let label = match issue.severity {
                    Severity::Error => "error".red().bold(),
                    Severity::Warning => "warning".yellow().bold(),
                };
                format!("{} [{}]: {}\n", label, issue.field, issue.message)
            })
            .collect()
    }

    pub fn json_outcome(outcome: &InvocationOutcome) -> String {
        Self::to_json(&json!({ "status": "ok", "outcome": outcome }))
    }

    pub fn json_error(error: &InvocationError) -> String {
        let value = match error {
            InvocationError::Failed(record) => json!({ "status": "failed", "error": record }),
            InvocationError::Cancelled { tool_name } => {
                json!({ "status": "cancelled", "tool_name": tool_name })
            }
        };
        Self::to_json(&value)
    }

    pub fn json_tools(tools: &ToolSpec) -> String {
        let tools: Vec<_> = tools.all().collect();
        Self::to_json(&json!({ "tools": tools }))
    }

    pub fn json_issues(issues: &[ConfigIssue]) -> String {
        let issues: Vec<Value> = issues
            .iter()
            .map(|issue| {
                json!({
                    "severity": if issue.is_error() { "error" } else { "warning" },
                    "code": format!("{:?}", issue.code),
                    "field": issue.field,
                    "message": issue.message,
                })
            })
            .collect();
        Self::to_json(&json!({ "issues": issues }))
    }

    fn to_json(value: &Value) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    fn pretty_value(value: &Value) -> String {
        match value {
            Value::String(text) => text.clone(),
            Value::Null => "(no result)".dimmed().to_string(),
            other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
        }
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_outcome(&self, outcome: &InvocationOutcome) -> String {
        match self.format {
            OutputFormat::Pretty => Self::pretty_outcome(outcome),
            OutputFormat::Json => Self::json_outcome(outcome),
        }
    }

    fn format_error(&self, error: &InvocationError) -> String {
        match self.format {
            OutputFormat::Pretty => Self::pretty_error(error),
            OutputFormat::Json => Self::json_error(error),
        }
    }

    fn format_tools(&self, tools: &ToolSpec) -> String {
        match self.format {
            OutputFormat::Pretty => Self::pretty_tools(tools),
            OutputFormat::Json => Self::json_tools(tools),
        }
    }

    fn format_issues(&self, issues: &[ConfigIssue]) -> String {
        match self.format {
            OutputFormat::Pretty => Self::pretty_issues(issues),
            OutputFormat::Json => Self::json_issues(issues),
        }
    }
}
