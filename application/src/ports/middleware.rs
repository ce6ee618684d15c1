//! Middleware participant port
//!
//! A participant observes every invocation through three hooks. Pre-hooks
//! run in ascending [`order`](MiddlewareParticipant::order); post- and
//! error-hooks run in descending order, so whoever enters first exits last.
//!
//! Participants are shared across concurrent invocations. Any state they
//! hold must be safe for concurrent access.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::error::InvocationError;

/// Failure raised by a participant hook.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Middleware '{participant}' failed: {message}")]
pub struct MiddlewareError {
    pub participant: String,
    /// Code the failure should be reported under; `TOOL_ERROR` when absent
    pub code: Option<String>,
    pub message: String,
}

impl MiddlewareError {
    pub fn new(participant: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            participant: participant.into(),
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// Cross-cutting observer of tool invocations.
///
/// `before_execution` sees the raw, not-yet-validated parameters. A failure
/// there stops the invocation before validation. Failures in the other two
/// hooks are logged and never change the invocation's outcome.
#[async_trait]
pub trait MiddlewareParticipant: Send + Sync {
    fn name(&self) -> &str;

    /// Lower runs earlier on the way in.
    fn order(&self) -> i32 {
        0
    }

    /// Read on every invocation; toggling takes effect on the next call.
    fn is_enabled(&self) -> bool {
        true
    }

    async fn before_execution(
        &self,
        _tool_name: &str,
        _raw_params: &Value,
        _cancel: &CancellationToken,
    ) -> Result<(), MiddlewareError> {
        Ok(())
    }

    async fn after_execution(
        &self,
        _tool_name: &str,
        _raw_params: &Value,
        _result: &Value,
        _elapsed_ms: u64,
    ) -> Result<(), MiddlewareError> {
        Ok(())
    }

    async fn on_error(
        &self,
        _tool_name: &str,
        _raw_params: &Value,
        _error: &InvocationError,
        _elapsed_ms: u64,
    ) -> Result<(), MiddlewareError> {
        Ok(())
    }
}
