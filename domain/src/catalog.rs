//! Error catalog: maps an [`ErrorCode`] to a message and recovery advice.
//!
//! [`DefaultErrorCatalog`] gives generic advice. Deployments
//! that know which tools are registered can wrap it in a
//! [`SuggestingErrorCatalog`] to append concrete "try tool X" suggestions.
//! Suggestions degrade gracefully: with no (or an empty) tool snapshot the
//! base advice is returned unchanged.

use crate::tool::entities::ToolSpec;
use crate::tool::value_objects::{ErrorCode, ErrorRecord, Recovery, SuggestedAction};

const MAX_NAME_SUGGESTIONS: usize = 3;

/// What the catalog knows about the failure being described.
#[derive(Debug, Clone, Copy)]
pub struct ErrorContext<'a> {
    pub tool_name: &'a str,
    /// Underlying cause, copied into the record's `detail`
    pub detail: Option<&'a str>,
    /// Tools currently registered with the host, if it can enumerate them
    pub available_tools: Option<&'a ToolSpec>,
}

impl<'a> ErrorContext<'a> {
    pub fn new(tool_name: &'a str) -> Self {
        Self {
            tool_name,
            detail: None,
            available_tools: None,
        }
    }

    pub fn with_detail(mut self, detail: &'a str) -> Self {
        self.detail = Some(detail);
        self
    }

    pub fn with_available_tools(mut self, tools: &'a ToolSpec) -> Self {
        self.available_tools = Some(tools);
        self
    }
}

/// Pure lookup from a code to a fresh [`ErrorRecord`].
pub trait ErrorCatalog: Send + Sync {
    fn lookup(&self, code: &ErrorCode, context: &ErrorContext<'_>) -> ErrorRecord;
}

/// Generic messages and recovery steps for every code.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultErrorCatalog;

impl DefaultErrorCatalog {
    fn message(code: &ErrorCode, tool: &str) -> String {
        match code {
            ErrorCode::ParameterRequired => {
                format!("Tool '{}' is missing required parameters", tool)
            }
            ErrorCode::ValidationError => format!("Invalid parameters for tool '{}'", tool),
            ErrorCode::ToolError => format!("Tool '{}' failed", tool),
            ErrorCode::Timeout => format!("Tool '{}' timed out", tool),
            ErrorCode::ResourceLimitExceeded => {
                format!("Tool '{}' would exceed its token budget", tool)
            }
            ErrorCode::ToolNotFound => format!("Tool '{}' is not registered", tool),
            ErrorCode::AlreadyReleased => {
                format!("Tool '{}' has released its resources", tool)
            }
            ErrorCode::Domain(domain) => format!("Tool '{}' reported {}", tool, domain),
        }
    }

    fn steps(code: &ErrorCode) -> &'static [&'static str] {
        match code {
            ErrorCode::ParameterRequired => &[
                "Check parameter requirements and supply every required parameter",
                "Blank strings count as missing values",
            ],
            ErrorCode::ValidationError => &[
                "Check parameter requirements against the tool definition",
                "Fix every listed violation before retrying",
            ],
            ErrorCode::ToolError => &[
                "Check the parameters passed to the tool",
                "Retry if the failure looks transient",
            ],
            ErrorCode::Timeout => &[
                "Retry if the failure looks transient",
                "Reduce request size or scope",
            ],
            ErrorCode::ResourceLimitExceeded => &[
                "Reduce request size (narrower filters, smaller limits)",
                "Split the request into several smaller calls",
            ],
            ErrorCode::ToolNotFound => &[
                "Check the tool name for typos",
                "List the available tools and pick one of them",
            ],
            ErrorCode::AlreadyReleased => &[
                "Ask the host to re-create the tool before invoking it again",
            ],
            ErrorCode::Domain(_) => &[
                "Check the tool's documentation for this error code",
                "Retry if the failure looks transient",
            ],
        }
    }
}

impl ErrorCatalog for DefaultErrorCatalog {
    fn lookup(&self, code: &ErrorCode, context: &ErrorContext<'_>) -> ErrorRecord {
        let mut record = ErrorRecord::new(
            code.clone(),
            context.tool_name,
            Self::message(code, context.tool_name),
        )
        .with_recovery(Recovery::new(Self::steps(code).iter().copied()));

        if let Some(detail) = context.detail {
            record = record.with_detail(detail);
        }
        record
    }
}

/// A suggestion that applies to a code, optionally only for one failing tool.
#[derive(Debug, Clone)]
struct SuggestionRule {
    code: ErrorCode,
    failing_tool: Option<String>,
    action: SuggestedAction,
}

/// Catalog that appends concrete alternatives drawn from the registered
/// tools.
///
/// Rules only fire when the suggested tool is present in the current
/// snapshot. Unknown-tool failures additionally get name-similar tools.
#[derive(Debug, Clone, Default)]
pub struct SuggestingErrorCatalog<C = DefaultErrorCatalog> {
    base: C,
    rules: Vec<SuggestionRule>,
}

impl SuggestingErrorCatalog<DefaultErrorCatalog> {
    pub fn new() -> Self {
        Self::with_base(DefaultErrorCatalog)
    }
}

impl<C: ErrorCatalog> SuggestingErrorCatalog<C> {
    pub fn with_base(base: C) -> Self {
        Self {
            base,
            rules: Vec::new(),
        }
    }

    /// Suggest `action` whenever any tool fails with `code`.
    pub fn suggest(mut self, code: ErrorCode, action: SuggestedAction) -> Self {
        self.rules.push(SuggestionRule {
            code,
            failing_tool: None,
            action,
        });
        self
    }

    /// Suggest `action` when `tool` fails with `code`.
    pub fn suggest_for(
        mut self,
        tool: impl Into<String>,
        code: ErrorCode,
        action: SuggestedAction,
    ) -> Self {
        self.rules.push(SuggestionRule {
            code,
            failing_tool: Some(tool.into()),
            action,
        });
        self
    }

    fn similar_names<'s>(requested: &str, spec: &'s ToolSpec) -> Vec<&'s str> {
        let requested = requested.to_ascii_lowercase();
        spec.names()
            .filter(|name| {
                let name = name.to_ascii_lowercase();
                name.contains(&requested)
                    || requested.contains(&name)
                    || common_prefix_len(&name, &requested) >= 3
            })
            .take(MAX_NAME_SUGGESTIONS)
            .collect()
    }
}

impl<C: ErrorCatalog> ErrorCatalog for SuggestingErrorCatalog<C> {
    fn lookup(&self, code: &ErrorCode, context: &ErrorContext<'_>) -> ErrorRecord {
        let mut record = self.base.lookup(code, context);

        let Some(spec) = context.available_tools else {
            return record;
        };
        if spec.is_empty() {
            return record;
        }

        for rule in &self.rules {
            let tool_matches = rule
                .failing_tool
                .as_deref()
                .is_none_or(|tool| tool == context.tool_name);
            if rule.code == *code
                && tool_matches
                && rule.action.tool != context.tool_name
                && spec.contains(&rule.action.tool)
            {
                record = record.with_suggestion(rule.action.clone());
            }
        }

        if *code == ErrorCode::ToolNotFound {
            for name in Self::similar_names(context.tool_name, spec) {
                let description = spec
                    .get(name)
                    .map(|d| d.description.clone())
                    .unwrap_or_default();
                record = record.with_suggestion(SuggestedAction::new(name, description));
            }
        }

        for action in record.suggested_actions.clone() {
            record
                .recovery
                .steps
                .push(format!("Try tool '{}' instead", action.tool));
        }

        record
    }
}

fn common_prefix_len(a: &str, b: &str) -> usize {
    a.chars().zip(b.chars()).take_while(|(x, y)| x == y).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::{ToolCategory, ToolDefinition};

    fn spec() -> ToolSpec {
        ToolSpec::new()
            .register(ToolDefinition::new("search_files", "Search file names", ToolCategory::Query))
            .register(ToolDefinition::new("search_text", "Search file contents", ToolCategory::Query))
            .register(ToolDefinition::new("echo", "Echo text", ToolCategory::Utility))
    }

    #[test]
    fn test_every_code_has_recovery_steps() {
        let codes = [
            ErrorCode::ParameterRequired,
            ErrorCode::ValidationError,
            ErrorCode::ToolError,
            ErrorCode::Timeout,
            ErrorCode::ResourceLimitExceeded,
            ErrorCode::ToolNotFound,
            ErrorCode::AlreadyReleased,
            ErrorCode::Domain("FILE_NOT_FOUND".to_string()),
        ];
        for code in codes {
            let record = DefaultErrorCatalog.lookup(&code, &ErrorContext::new("divide"));
            assert!(!record.recovery.steps.is_empty(), "no steps for {}", code);
            assert!(record.message.contains("divide"));
            assert_eq!(record.code, code);
        }
    }

    #[test]
    fn test_detail_is_copied() {
        let context = ErrorContext::new("divide").with_detail("Division by zero");
        let record = DefaultErrorCatalog.lookup(&ErrorCode::ToolError, &context);
        assert_eq!(record.detail.as_deref(), Some("Division by zero"));
    }

    #[test]
    fn test_suggestions_only_for_registered_tools() {
        let catalog = SuggestingErrorCatalog::new()
            .suggest(
                ErrorCode::ResourceLimitExceeded,
                SuggestedAction::new("search_files", "Cheaper listing"),
            )
            .suggest(
                ErrorCode::ResourceLimitExceeded,
                SuggestedAction::new("not_registered", "Never shown"),
            );

        let spec = spec();
        let context = ErrorContext::new("search_text").with_available_tools(&spec);
        let record = catalog.lookup(&ErrorCode::ResourceLimitExceeded, &context);

        assert_eq!(record.suggested_actions.len(), 1);
        assert_eq!(record.suggested_actions[0].tool, "search_files");
        assert!(record.recovery.steps.iter().any(|s| s.contains("search_files")));
    }

    #[test]
    fn test_tool_specific_rule() {
        let catalog = SuggestingErrorCatalog::new().suggest_for(
            "search_text",
            ErrorCode::Timeout,
            SuggestedAction::new("search_files", "Faster"),
        );
        let spec = spec();

        let hit = catalog.lookup(
            &ErrorCode::Timeout,
            &ErrorContext::new("search_text").with_available_tools(&spec),
        );
        assert_eq!(hit.suggested_actions.len(), 1);

        let miss = catalog.lookup(
            &ErrorCode::Timeout,
            &ErrorContext::new("echo").with_available_tools(&spec),
        );
        assert!(miss.suggested_actions.is_empty());
    }

    #[test]
    fn test_unknown_tool_suggests_similar_names() {
        let spec = spec();
        let record = SuggestingErrorCatalog::new().lookup(
            &ErrorCode::ToolNotFound,
            &ErrorContext::new("search").with_available_tools(&spec),
        );
        let tools: Vec<_> = record.suggested_actions.iter().map(|a| a.tool.as_str()).collect();
        assert_eq!(tools, vec!["search_files", "search_text"]);
    }

    #[test]
    fn test_empty_or_missing_registry_degrades_to_base_steps() {
        let catalog = SuggestingErrorCatalog::new().suggest(
            ErrorCode::ToolError,
            SuggestedAction::new("echo", "fallback"),
        );
        let base = DefaultErrorCatalog.lookup(&ErrorCode::ToolError, &ErrorContext::new("x"));

        let no_registry = catalog.lookup(&ErrorCode::ToolError, &ErrorContext::new("x"));
        assert_eq!(no_registry, base);

        let empty = ToolSpec::new();
        let empty_registry = catalog.lookup(
            &ErrorCode::ToolError,
            &ErrorContext::new("x").with_available_tools(&empty),
        );
        assert_eq!(empty_registry, base);
    }
}
