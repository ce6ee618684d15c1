//! Governor configuration: effective budgets and release policies.
//!
//! [`GovernorConfig`] is the resolved, in-memory form of the `[budget]` and
//! `[tools.<name>]` file sections. Infrastructure loads it; the governor
//! only reads it.

use std::collections::HashMap;

use governor_domain::BudgetConfig;

use crate::ports::resource::ReleasePolicy;

/// Budget and release settings the governor consults per invocation.
///
/// # Budget precedence
///
/// | Source | Wins over |
/// |--------|-----------|
/// | `tool_budgets[name]` (config file) | everything |
/// | `Tool::budget()` | default |
/// | `default_budget` | nothing |
#[derive(Debug, Clone, Default)]
pub struct GovernorConfig {
    pub default_budget: BudgetConfig,
    pub tool_budgets: HashMap<String, BudgetConfig>,
    pub release_on_failure: HashMap<String, bool>,
}

impl GovernorConfig {
    pub fn new(default_budget: BudgetConfig) -> Self {
        Self {
            default_budget,
            ..Self::default()
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_tool_budget(mut self, tool: impl Into<String>, budget: BudgetConfig) -> Self {
        self.tool_budgets.insert(tool.into(), budget);
        self
    }

    pub fn with_release_on_failure(mut self, tool: impl Into<String>, release: bool) -> Self {
        self.release_on_failure.insert(tool.into(), release);
        self
    }

    // ==================== Resolution ====================

    /// Budget that applies to `tool` given the tool's own preference.
    pub fn effective_budget(&self, tool: &str, preferred: Option<BudgetConfig>) -> BudgetConfig {
        self.tool_budgets
            .get(tool)
            .copied()
            .or(preferred)
            .unwrap_or(self.default_budget)
    }

    /// Release policy for `tool`, with a config entry overriding the
    /// tool's declared policy.
    pub fn release_policy(&self, tool: &str, declared: ReleasePolicy) -> ReleasePolicy {
        match self.release_on_failure.get(tool) {
            Some(&release_on_failure) => ReleasePolicy { release_on_failure },
            None => declared,
        }
    }
}
