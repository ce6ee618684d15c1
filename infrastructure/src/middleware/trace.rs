//! Tracing participant: structured start/finish/error logs per invocation.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use governor_application::{InvocationError, MiddlewareError, MiddlewareParticipant};
use governor_domain::util::preview;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub const TRACING_ORDER: i32 = -100;

/// Longest parameter/result excerpt written to a log line.
const PREVIEW_BYTES: usize = 200;

/// Logs every invocation with its raw parameters and result excerpt.
pub struct TracingMiddleware {
    enabled: AtomicBool,
}

impl TracingMiddleware {
    pub fn new() -> Self {
        Self {
            enabled: AtomicBool::new(true),
        }
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }
}

impl Default for TracingMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MiddlewareParticipant for TracingMiddleware {
    fn name(&self) -> &str {
        "tracing"
    }

    fn order(&self) -> i32 {
        TRACING_ORDER
    }

    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    async fn before_execution(
        &self,
        tool_name: &str,
        raw_params: &Value,
        _cancel: &CancellationToken,
    ) -> Result<(), MiddlewareError> {
        debug!(
            tool_name,
            params = %preview(&raw_params.to_string(), PREVIEW_BYTES),
            "Tool invocation starting"
        );
        Ok(())
    }

    async fn after_execution(
        &self,
        tool_name: &str,
        _raw_params: &Value,
        result: &Value,
        elapsed_ms: u64,
    ) -> Result<(), MiddlewareError> {
        debug!(
            tool_name,
            elapsed_ms,
            result = %preview(&result.to_string(), PREVIEW_BYTES),
            "Tool invocation finished"
        );
        Ok(())
    }

    async fn on_error(
        &self,
        tool_name: &str,
        _raw_params: &Value,
        error: &InvocationError,
        elapsed_ms: u64,
    ) -> Result<(), MiddlewareError> {
        debug!(tool_name, elapsed_ms, error = %error, "Tool invocation ended with error");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_hooks_never_fail() {
        let middleware = TracingMiddleware::new();
        let params = json!({"text": "x".repeat(1000)});
        assert!(
            middleware
                .before_execution("echo", &params, &CancellationToken::new())
                .await
                .is_ok()
        );
        assert!(middleware.after_execution("echo", &params, &json!(1), 3).await.is_ok());
    }

    #[test]
    fn test_toggle() {
        let middleware = TracingMiddleware::default();
        assert!(middleware.is_enabled());
        middleware.set_enabled(false);
        assert!(!middleware.is_enabled());
        assert_eq!(middleware.order(), TRACING_ORDER);
    }
}
