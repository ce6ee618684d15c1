//! Heuristic token cost estimation.
//!
//! [`CostEstimator`] predicts how many tokens an invocation will cost before
//! the tool body runs. It is a heuristic, not a tokenizer: it makes no
//! external calls and the same input always yields the same estimate.
//!
//! # Composition
//!
//! ```text
//! estimate = ceil((baseline(category)
//!                + text(serialized params)
//!                + shape(declared result, category)) × multiplier)
//! ```
//!
//! After execution the same text heuristic is applied to the realized
//! result so the caller can log estimate-vs-actual deviation. That number is
//! telemetry only and never feeds back into control flow.

pub mod shape;
pub mod text;

pub use shape::{category_baseline, estimate_shape, expected_items};
pub use text::{TextProfile, estimate_text_tokens};

use serde::Serialize;
use serde_json::Value;

use crate::tool::entities::ToolCategory;
use crate::tool::shape::ResultShape;

/// Breakdown of a pre-execution estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostEstimate {
    pub baseline: u64,
    pub params_tokens: u64,
    pub shape_tokens: u64,
    pub multiplier: f64,
    /// Padded total consulted by the budget policy
    pub total: u64,
}

/// Stateless estimator.
#[derive(Debug, Clone, Copy, Default)]
pub struct CostEstimator;

impl CostEstimator {
    pub fn new() -> Self {
        Self
    }

    /// Estimate the cost of a call before running it.
    pub fn estimate(
        &self,
        params: &Value,
        result_shape: &ResultShape,
        category: ToolCategory,
        multiplier: f64,
    ) -> CostEstimate {
        let baseline = category_baseline(category);
        let params_tokens = self.estimate_value(params);
        let shape_tokens = estimate_shape(result_shape, category);
        let raw = baseline + params_tokens + shape_tokens;

        CostEstimate {
            baseline,
            params_tokens,
            shape_tokens,
            multiplier,
            total: (raw as f64 * multiplier).ceil() as u64,
        }
    }

    /// Text heuristic applied to a serialized JSON value.
    pub fn estimate_value(&self, value: &Value) -> u64 {
        match value {
            Value::Null => 0,
            Value::String(text) => estimate_text_tokens(text),
            other => estimate_text_tokens(&other.to_string()),
        }
    }

    pub fn estimate_text(&self, text: &str) -> u64 {
        estimate_text_tokens(text)
    }
}

/// `|estimated - actual| / max(estimated, actual)`, or 0 when both are 0.
pub fn relative_deviation(estimated: u64, actual: u64) -> f64 {
    let larger = estimated.max(actual);
    if larger == 0 {
        return 0.0;
    }
    estimated.abs_diff(actual) as f64 / larger as f64
}
