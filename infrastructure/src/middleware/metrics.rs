//! Metrics participant: per-tool invocation counters.
//!
//! Counters live in a [`DashMap`] keyed by tool name; concurrent updates to
//! the same tool serialize on that tool's shard.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use governor_application::{InvocationError, MiddlewareError, MiddlewareParticipant};
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

pub const METRICS_ORDER: i32 = -50;

/// Counters for one tool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ToolMetrics {
    pub calls: u64,
    pub successes: u64,
    pub failures: u64,
    pub cancellations: u64,
    /// Sum of elapsed time over completed calls
    pub total_elapsed_ms: u64,
}

impl ToolMetrics {
    /// Mean elapsed time over completed calls.
    pub fn mean_elapsed_ms(&self) -> Option<u64> {
        let completed = self.successes + self.failures + self.cancellations;
        (completed > 0).then(|| self.total_elapsed_ms / completed)
    }
}

/// Counts calls, successes, failures and cancellations per tool.
#[derive(Clone)]
pub struct MetricsMiddleware {
    metrics: Arc<DashMap<String, ToolMetrics>>,
    enabled: Arc<AtomicBool>,
}

impl MetricsMiddleware {
    pub fn new() -> Self {
        Self {
            metrics: Arc::new(DashMap::new()),
            enabled: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn get(&self, tool_name: &str) -> Option<ToolMetrics> {
        self.metrics.get(tool_name).map(|entry| *entry.value())
    }

    /// Copy of every tool's counters, sorted by name.
    pub fn snapshot(&self) -> BTreeMap<String, ToolMetrics> {
        self.metrics
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }

    fn update(&self, tool_name: &str, apply: impl FnOnce(&mut ToolMetrics)) {
        let mut entry = self.metrics.entry(tool_name.to_string()).or_default();
        apply(entry.value_mut());
    }
}

impl Default for MetricsMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MiddlewareParticipant for MetricsMiddleware {
    fn name(&self) -> &str {
        "metrics"
    }

    fn order(&self) -> i32 {
        METRICS_ORDER
    }

    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    async fn before_execution(
        &self,
        tool_name: &str,
        _raw_params: &Value,
        _cancel: &CancellationToken,
    ) -> Result<(), MiddlewareError> {
        self.update(tool_name, |m| m.calls += 1);
        Ok(())
    }

    async fn after_execution(
        &self,
        tool_name: &str,
        _raw_params: &Value,
        _result: &Value,
        elapsed_ms: u64,
    ) -> Result<(), MiddlewareError> {
        self.update(tool_name, |m| {
            m.successes += 1;
            m.total_elapsed_ms += elapsed_ms;
        });
        Ok(())
    }

    async fn on_error(
        &self,
        tool_name: &str,
        _raw_params: &Value,
        error: &InvocationError,
        elapsed_ms: u64,
    ) -> Result<(), MiddlewareError> {
        let cancelled = error.is_cancelled();
        self.update(tool_name, |m| {
            if cancelled {
                m.cancellations += 1;
            } else {
                m.failures += 1;
            }
            m.total_elapsed_ms += elapsed_ms;
        });
        Ok(())
    }
}
