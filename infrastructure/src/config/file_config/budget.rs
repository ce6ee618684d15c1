//! Budget configuration from TOML (`[budget]` section)

use governor_domain::{BudgetConfig, BudgetStrategy, ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Process-wide default budget.
///
/// # Example
///
/// ```toml
/// [budget]
/// max_tokens = 25000
/// warning_threshold = 20000
/// strategy = "warn"          # throw | warn | truncate_signal | ignore
/// estimation_multiplier = 1.2
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBudgetConfig {
    pub max_tokens: u64,
    pub warning_threshold: u64,
    /// Kept as a string so an unknown value degrades to a warning
    pub strategy: String,
    pub estimation_multiplier: f64,
}

impl Default for FileBudgetConfig {
    fn default() -> Self {
        let budget = BudgetConfig::default();
        Self {
            max_tokens: budget.max_tokens(),
            warning_threshold: budget.warning_threshold(),
            strategy: budget.strategy().as_str().to_string(),
            estimation_multiplier: budget.estimation_multiplier(),
        }
    }
}

impl FileBudgetConfig {
    /// Convert to a domain `BudgetConfig`, returning validation issues.
    ///
    /// Invalid values fall back to `fallback` as a whole block.
    pub fn to_budget(&self, section: &str, fallback: BudgetConfig) -> (BudgetConfig, Vec<ConfigIssue>) {
        resolve_budget(
            section,
            self.max_tokens,
            self.warning_threshold,
            &self.strategy,
            self.estimation_multiplier,
            fallback,
        )
    }
}

/// Shared by `[budget]` and `[tools.<name>]`.
pub(super) fn resolve_budget(
    section: &str,
    max_tokens: u64,
    warning_threshold: u64,
    strategy: &str,
    estimation_multiplier: f64,
    fallback: BudgetConfig,
) -> (BudgetConfig, Vec<ConfigIssue>) {
    let mut issues = Vec::new();

    let strategy = match strategy.parse::<BudgetStrategy>() {
        Ok(strategy) => strategy,
        Err(message) => {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::UnknownStrategy,
                format!("{}.strategy", section),
                format!("{}, falling back to '{}'", message, fallback.strategy()),
            ));
            fallback.strategy()
        }
    };

    if strategy == BudgetStrategy::Ignore {
        issues.push(ConfigIssue::warning(
            ConfigIssueCode::EnforcementDisabled,
            format!("{}.strategy", section),
            "strategy 'ignore' disables budget enforcement",
        ));
    }

    match BudgetConfig::try_new(max_tokens, warning_threshold, strategy, estimation_multiplier) {
        Ok(budget) => (budget, issues),
        Err(errors) => {
            issues.extend(errors.into_iter().map(|message| {
                ConfigIssue::warning(
                    ConfigIssueCode::InvalidBudget,
                    section,
                    format!("{}; using defaults for [{}]", message, section),
                )
            }));
            (fallback, issues)
        }
    }
}
