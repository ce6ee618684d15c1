//! Raw TOML configuration data types
//!
//! These structs mirror the config file exactly. Conversion to application
//! types happens in [`FileConfig::to_governor_config`], which never fails:
//! bad values fall back to defaults and come back as [`ConfigIssue`]s.

mod budget;
mod middleware;
mod tools;

pub use budget::FileBudgetConfig;
pub use middleware::{FileMiddlewareConfig, FileTelemetryConfig};
pub use tools::FileToolConfig;

use std::collections::BTreeMap;

use governor_application::GovernorConfig;
use governor_domain::{BudgetConfig, ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Default budget for every tool
    pub budget: FileBudgetConfig,
    /// Per-tool overrides keyed by tool name
    pub tools: BTreeMap<String, FileToolConfig>,
    /// Built-in global middleware
    pub middleware: FileMiddlewareConfig,
    /// Invocation telemetry sink
    pub telemetry: FileTelemetryConfig,
}

impl FileConfig {
    /// Resolve budgets and release policies, returning all detected issues.
    pub fn to_governor_config(&self) -> (GovernorConfig, Vec<ConfigIssue>) {
        let mut issues = Vec::new();

        let (default_budget, budget_issues) =
            self.budget.to_budget("budget", BudgetConfig::default());
        issues.extend(budget_issues);

        let mut config = GovernorConfig::new(default_budget);
        for (name, tool) in &self.tools {
            let (budget, tool_issues) = tool.to_budget(name, default_budget);
            issues.extend(tool_issues);
            if let Some(budget) = budget {
                config = config.with_tool_budget(name, budget);
            }
            if let Some(release) = tool.release_on_failure {
                config = config.with_release_on_failure(name, release);
            }
        }

        (config, issues)
    }

    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.to_governor_config().1;
        issues.extend(self.middleware.validate());
        issues
    }

    /// Render the merged configuration as TOML (for --show-config).
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Flag `[tools.<name>]` sections that name no registered tool.
    pub fn validate_tool_names<'a>(&self, known: impl IntoIterator<Item = &'a str>) -> Vec<ConfigIssue> {
        let known: Vec<&str> = known.into_iter().collect();
        self.tools
            .keys()
            .filter(|name| !known.contains(&name.as_str()))
            .map(|name| {
                ConfigIssue::warning(
                    ConfigIssueCode::UnknownTool,
                    format!("tools.{}", name),
                    format!("no tool named '{}' is registered; section ignored", name),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use governor_domain::BudgetStrategy;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[budget]
max_tokens = 10000
warning_threshold = 8000
strategy = "throw"
estimation_multiplier = 1.5

[tools.divide]
max_tokens = 2000

[tools.append_journal]
release_on_failure = true

[middleware]
metrics = false
max_payload_bytes = 4096

[telemetry]
jsonl_path = "/tmp/governor.jsonl"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(!config.middleware.metrics);
        assert!(config.middleware.logging);
        assert_eq!(config.middleware.max_payload_bytes, Some(4096));
        assert!(config.telemetry.jsonl_path.is_some());

        let (governor, issues) = config.to_governor_config();
        assert!(issues.is_empty());
        assert_eq!(governor.default_budget.max_tokens(), 10_000);

        let divide = governor.effective_budget("divide", None);
        assert_eq!(divide.max_tokens(), 2000);
        // Inherited from [budget]
        assert_eq!(divide.strategy(), BudgetStrategy::Throw);
        assert_eq!(divide.estimation_multiplier(), 1.5);

        assert!(!governor.tool_budgets.contains_key("append_journal"));
        assert_eq!(governor.release_on_failure.get("append_journal"), Some(&true));
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: FileConfig = toml::from_str("[middleware]\nlogging = false\n").unwrap();
        assert!(!config.middleware.logging);
        assert_eq!(config.budget, FileBudgetConfig::default());
        assert!(config.tools.is_empty());
    }

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        let (governor, issues) = config.to_governor_config();
        assert!(issues.is_empty());
        assert_eq!(governor.default_budget, BudgetConfig::default());
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(FileConfig::default().validate().is_empty());
    }

    #[test]
    fn test_invalid_budget_reports_and_falls_back() {
        let config: FileConfig = toml::from_str("[budget]\nmax_tokens = 0\n").unwrap();
        let (governor, issues) = config.to_governor_config();
        assert_eq!(governor.default_budget, BudgetConfig::default());
        assert!(!issues.is_empty());
        assert!(issues.iter().any(|i| i.message.contains("max_tokens must be > 0")));
    }

    #[test]
    fn test_validate_tool_names() {
        let config: FileConfig = toml::from_str("[tools.ecko]\nmax_tokens = 100\n").unwrap();
        let issues = config.validate_tool_names(["echo", "divide"]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "tools.ecko");
        assert!(config.validate_tool_names(["ecko"]).is_empty());
    }

    #[test]
    fn test_to_toml_round_trips() {
        let mut config = FileConfig::default();
        config.tools.insert(
            "divide".to_string(),
            FileToolConfig {
                max_tokens: Some(2000),
                ..FileToolConfig::default()
            },
        );
        let rendered = config.to_toml().unwrap();
        assert!(rendered.contains("[tools.divide]"));
        let back: FileConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(back, config);
    }
}
