//! Per-tool configuration from TOML (`[tools.<name>]` sections)
//!
//! Any `[budget]` key can be overridden per tool. Unset keys inherit from
//! `[budget]`. A section that only sets `release_on_failure` leaves the
//! tool's own preferred budget in charge.
//!
//! ```toml
//! [tools.divide]
//! max_tokens = 2000
//! strategy = "throw"
//!
//! [tools.append_journal]
//! release_on_failure = true
//! ```

use governor_domain::{BudgetConfig, ConfigIssue};
use serde::{Deserialize, Serialize};

use super::budget::resolve_budget;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToolConfig {
    pub max_tokens: Option<u64>,
    pub warning_threshold: Option<u64>,
    pub strategy: Option<String>,
    pub estimation_multiplier: Option<f64>,
    /// Release the tool's resources after any failed invocation
    pub release_on_failure: Option<bool>,
}

impl FileToolConfig {
    /// Whether any budget key is set.
    pub fn overrides_budget(&self) -> bool {
        self.max_tokens.is_some()
            || self.warning_threshold.is_some()
            || self.strategy.is_some()
            || self.estimation_multiplier.is_some()
    }

    /// Budget override layered on `base`, or `None` if no key is set.
    ///
    /// A bare `max_tokens` override moves the warning threshold to 80% of
    /// it unless the threshold is also set.
    pub fn to_budget(&self, tool: &str, base: BudgetConfig) -> (Option<BudgetConfig>, Vec<ConfigIssue>) {
        if !self.overrides_budget() {
            return (None, Vec::new());
        }

        let max_tokens = self.max_tokens.unwrap_or(base.max_tokens());
        let warning_threshold = match (self.warning_threshold, self.max_tokens) {
            (Some(threshold), _) => threshold,
            (None, Some(max)) => max / 5 * 4,
            (None, None) => base.warning_threshold(),
        };
        let strategy = self
            .strategy
            .clone()
            .unwrap_or_else(|| base.strategy().as_str().to_string());
        let multiplier = self
            .estimation_multiplier
            .unwrap_or(base.estimation_multiplier());

        let (budget, issues) = resolve_budget(
            &format!("tools.{}", tool),
            max_tokens,
            warning_threshold,
            &strategy,
            multiplier,
            base,
        );
        (Some(budget), issues)
    }
}
