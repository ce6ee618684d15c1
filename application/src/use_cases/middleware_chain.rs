//! Per-invocation middleware chain.
//!
//! The chain is rebuilt for every call from the registry's global snapshot
//! and the tool's own participants. Building it is a filter plus a stable
//! sort, so enabling or disabling a participant applies to the next call
//! without any restart.

use std::sync::Arc;

use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::error::InvocationError;
use crate::ports::middleware::{MiddlewareError, MiddlewareParticipant};

/// Enabled participants sorted ascending by order.
#[derive(Clone, Default)]
pub struct MiddlewareChain {
    participants: Vec<Arc<dyn MiddlewareParticipant>>,
}

impl MiddlewareChain {
    /// Merge global and tool-local participants.
    ///
    /// Ties keep insertion order, global participants first.
    pub fn compose(
        global: &[Arc<dyn MiddlewareParticipant>],
        local: &[Arc<dyn MiddlewareParticipant>],
    ) -> Self {
        let mut participants: Vec<_> = global
            .iter()
            .chain(local)
            .filter(|p| p.is_enabled())
            .cloned()
            .collect();
        participants.sort_by_key(|p| p.order());
        Self { participants }
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.participants.iter().map(|p| p.name()).collect()
    }

    /// Run pre-hooks in ascending order, stopping at the first failure.
    pub async fn run_before(
        &self,
        tool_name: &str,
        raw_params: &Value,
        cancel: &CancellationToken,
    ) -> Result<(), MiddlewareError> {
        for participant in &self.participants {
            participant
                .before_execution(tool_name, raw_params, cancel)
                .await?;
        }
        Ok(())
    }

    /// Run post-hooks in descending order. Failures are logged only.
    pub async fn run_after(&self, tool_name: &str, raw_params: &Value, result: &Value, elapsed_ms: u64) {
        for participant in self.participants.iter().rev() {
            if let Err(e) = participant
                .after_execution(tool_name, raw_params, result, elapsed_ms)
                .await
            {
                warn!(
                    tool_name,
                    participant = participant.name(),
                    error = %e,
                    "Post-execution hook failed"
                );
            }
        }
    }

    /// Run error hooks in descending order. Every participant runs even if
    /// an earlier one fails.
    pub async fn run_on_error(
        &self,
        tool_name: &str,
        raw_params: &Value,
        error: &InvocationError,
        elapsed_ms: u64,
    ) {
        for participant in self.participants.iter().rev() {
            if let Err(e) = participant
                .on_error(tool_name, raw_params, error, elapsed_ms)
                .await
            {
                warn!(
                    tool_name,
                    participant = participant.name(),
                    error = %e,
                    "Error hook failed"
                );
            }
        }
    }
}

impl std::fmt::Debug for MiddlewareChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
