//! Output formatter trait

use governor_application::{InvocationError, InvocationOutcome};
use governor_domain::{ConfigIssue, ToolSpec};

/// Renders governor results for a terminal.
pub trait OutputFormatter {
    /// Render a successful invocation
    fn format_outcome(&self, outcome: &InvocationOutcome) -> String;

    /// Render a failed or cancelled invocation
    fn format_error(&self, error: &InvocationError) -> String;

    /// Render the registered tools
    fn format_tools(&self, tools: &ToolSpec) -> String;

    /// Render configuration issues
    fn format_issues(&self, issues: &[ConfigIssue]) -> String;
}
