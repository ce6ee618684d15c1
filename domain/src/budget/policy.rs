//! Budget enforcement policy.

use serde::{Deserialize, Serialize};

use super::config::{BudgetConfig, BudgetStrategy};

/// Outcome of checking an estimate against a budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetDecision {
    Proceed,
    ProceedWarn,
    /// Continue; a downstream reducer should shrink the result
    ProceedTruncateSignal,
    Abort,
}

impl BudgetDecision {
    pub fn allows_execution(&self) -> bool {
        !matches!(self, BudgetDecision::Abort)
    }

    pub fn truncate_signal(&self) -> bool {
        matches!(self, BudgetDecision::ProceedTruncateSignal)
    }

    pub fn as_str(&self) -> &str {
        match self {
            BudgetDecision::Proceed => "proceed",
            BudgetDecision::ProceedWarn => "proceed_warn",
            BudgetDecision::ProceedTruncateSignal => "proceed_truncate_signal",
            BudgetDecision::Abort => "abort",
        }
    }
}

impl std::fmt::Display for BudgetDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A decision plus the facts it was made on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetAssessment {
    pub decision: BudgetDecision,
    pub estimate: u64,
    pub max_tokens: u64,
    /// Within the ceiling but above the warning threshold
    pub near_limit: bool,
}

impl BudgetAssessment {
    pub fn over_limit(&self) -> bool {
        self.estimate > self.max_tokens
    }
}

/// Pure decision function from an estimate and a budget to a [`BudgetDecision`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BudgetPolicy;

impl BudgetPolicy {
    pub fn evaluate(estimate: u64, config: &BudgetConfig) -> BudgetAssessment {
        let over_limit = estimate > config.max_tokens();
        let decision = if over_limit {
            match config.strategy() {
                BudgetStrategy::Throw => BudgetDecision::Abort,
                BudgetStrategy::Warn => BudgetDecision::ProceedWarn,
                BudgetStrategy::TruncateSignal => BudgetDecision::ProceedTruncateSignal,
                BudgetStrategy::Ignore => BudgetDecision::Proceed,
            }
        } else {
            BudgetDecision::Proceed
        };

        BudgetAssessment {
            decision,
            estimate,
            max_tokens: config.max_tokens(),
            near_limit: !over_limit && estimate > config.warning_threshold(),
        }
    }
}
