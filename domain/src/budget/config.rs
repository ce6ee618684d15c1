//! Token budget configuration.
//!
//! [`BudgetConfig`] bounds how many tokens a single invocation is expected to
//! produce and chooses what happens when the estimate overshoots.

use serde::{Deserialize, Serialize};

/// What to do when an estimate exceeds `max_tokens`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStrategy {
    /// Abort before the tool body runs
    Throw,
    /// Log a warning and continue
    #[default]
    Warn,
    /// Continue, flagging the result for downstream reduction
    TruncateSignal,
    /// Continue silently
    Ignore,
}

impl BudgetStrategy {
    pub fn as_str(&self) -> &str {
        match self {
            BudgetStrategy::Throw => "throw",
            BudgetStrategy::Warn => "warn",
            BudgetStrategy::TruncateSignal => "truncate_signal",
            BudgetStrategy::Ignore => "ignore",
        }
    }
}

impl std::fmt::Display for BudgetStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BudgetStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "throw" => Ok(BudgetStrategy::Throw),
            "warn" => Ok(BudgetStrategy::Warn),
            "truncate_signal" | "truncate" => Ok(BudgetStrategy::TruncateSignal),
            "ignore" => Ok(BudgetStrategy::Ignore),
            other => Err(format!(
                "unknown budget strategy '{}' (expected throw, warn, truncate_signal or ignore)",
                other
            )),
        }
    }
}

/// Per-tool token budget.
///
/// Four knobs:
/// - `max_tokens`: ceiling the estimate is compared against
/// - `warning_threshold`: estimates above this (but within the ceiling) get a debug note
/// - `strategy`: what happens above the ceiling
/// - `estimation_multiplier`: safety padding applied to the raw estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetConfig {
    max_tokens: u64,
    warning_threshold: u64,
    strategy: BudgetStrategy,
    estimation_multiplier: f64,
}

impl BudgetConfig {
    /// Create a new budget with explicit values.
    pub fn new(
        max_tokens: u64,
        warning_threshold: u64,
        strategy: BudgetStrategy,
        estimation_multiplier: f64,
    ) -> Self {
        Self {
            max_tokens,
            warning_threshold,
            strategy,
            estimation_multiplier,
        }
    }

    /// Create a budget, rejecting values that violate the constraints.
    pub fn try_new(
        max_tokens: u64,
        warning_threshold: u64,
        strategy: BudgetStrategy,
        estimation_multiplier: f64,
    ) -> Result<Self, Vec<String>> {
        let budget = Self::new(max_tokens, warning_threshold, strategy, estimation_multiplier);
        let issues = budget.validate();
        if issues.is_empty() {
            Ok(budget)
        } else {
            Err(issues)
        }
    }

    /// Budget with `max_tokens` and a warning threshold at 80% of it.
    pub fn with_limit(max_tokens: u64, strategy: BudgetStrategy) -> Self {
        Self {
            max_tokens,
            warning_threshold: max_tokens / 5 * 4,
            strategy,
            ..Self::default()
        }
    }

    /// No ceiling at all.
    pub fn unlimited() -> Self {
        Self {
            max_tokens: u64::MAX,
            warning_threshold: u64::MAX - 1,
            strategy: BudgetStrategy::Ignore,
            estimation_multiplier: 1.0,
        }
    }

    // ==================== Accessors ====================

    pub fn max_tokens(&self) -> u64 {
        self.max_tokens
    }

    pub fn warning_threshold(&self) -> u64 {
        self.warning_threshold
    }

    pub fn strategy(&self) -> BudgetStrategy {
        self.strategy
    }

    pub fn estimation_multiplier(&self) -> f64 {
        self.estimation_multiplier
    }

    // ==================== Builder Methods ====================

    pub fn with_max_tokens(mut self, max_tokens: u64) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_warning_threshold(mut self, threshold: u64) -> Self {
        self.warning_threshold = threshold;
        self
    }

    pub fn with_strategy(mut self, strategy: BudgetStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_estimation_multiplier(mut self, multiplier: f64) -> Self {
        self.estimation_multiplier = multiplier;
        self
    }

    // ==================== Validation ====================

    /// Validate this budget, returning a list of issues.
    ///
    /// Rules:
    /// - `max_tokens > 0`
    /// - `warning_threshold < max_tokens`
    /// - `estimation_multiplier` is finite and `>= 1.0`
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.max_tokens == 0 {
            issues.push("budget: max_tokens must be > 0".to_string());
        }
        if self.warning_threshold >= self.max_tokens {
            issues.push(format!(
                "budget: warning_threshold ({}) must be < max_tokens ({})",
                self.warning_threshold, self.max_tokens
            ));
        }
        if !self.estimation_multiplier.is_finite() || self.estimation_multiplier < 1.0 {
            issues.push(format!(
                "budget: estimation_multiplier ({}) must be >= 1.0",
                self.estimation_multiplier
            ));
        }
        issues
    }
}

impl Default for BudgetConfig {
    /// Default: 25k ceiling, warn above 20k, `Warn` strategy, 1.2× padding.
    fn default() -> Self {
        Self {
            max_tokens: 25_000,
            warning_threshold: 20_000,
            strategy: BudgetStrategy::Warn,
            estimation_multiplier: 1.2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let budget = BudgetConfig::default();
        assert_eq!(budget.max_tokens(), 25_000);
        assert_eq!(budget.warning_threshold(), 20_000);
        assert_eq!(budget.strategy(), BudgetStrategy::Warn);
        assert!(budget.estimation_multiplier() > 1.0);
        assert!(budget.validate().is_empty());
    }

    #[test]
    fn test_with_limit() {
        let budget = BudgetConfig::with_limit(1000, BudgetStrategy::Throw);
        assert_eq!(budget.max_tokens(), 1000);
        assert_eq!(budget.warning_threshold(), 800);
        assert_eq!(budget.strategy(), BudgetStrategy::Throw);
        assert!(budget.validate().is_empty());
    }

    #[test]
    fn test_builder() {
        let budget = BudgetConfig::default()
            .with_max_tokens(5_000)
            .with_warning_threshold(4_000)
            .with_strategy(BudgetStrategy::TruncateSignal)
            .with_estimation_multiplier(1.5);
        assert_eq!(budget.max_tokens(), 5_000);
        assert_eq!(budget.warning_threshold(), 4_000);
        assert_eq!(budget.strategy(), BudgetStrategy::TruncateSignal);
        assert_eq!(budget.estimation_multiplier(), 1.5);
    }

    #[test]
    fn test_try_new_rejects_invalid_values() {
        let issues = BudgetConfig::try_new(1000, 1000, BudgetStrategy::Warn, 0.5).unwrap_err();
        assert_eq!(issues.len(), 2);
        assert!(issues[0].contains("warning_threshold"));
        assert!(issues[1].contains("estimation_multiplier"));

        let issues = BudgetConfig::try_new(0, 0, BudgetStrategy::Warn, 1.0).unwrap_err();
        assert!(issues.iter().any(|i| i.contains("max_tokens must be > 0")));

        assert!(BudgetConfig::try_new(1000, 500, BudgetStrategy::Ignore, 1.0).is_ok());
    }

    #[test]
    fn test_strategy_parse() {
        assert_eq!("throw".parse::<BudgetStrategy>().unwrap(), BudgetStrategy::Throw);
        assert_eq!("TRUNCATE".parse::<BudgetStrategy>().unwrap(), BudgetStrategy::TruncateSignal);
        assert!("explode".parse::<BudgetStrategy>().is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let budget = BudgetConfig::new(10_000, 9_000, BudgetStrategy::Throw, 1.1);
        let json = serde_json::to_string(&budget).unwrap();
        assert!(json.contains("\"throw\""));
        let deserialized: BudgetConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(budget, deserialized);
    }
}
