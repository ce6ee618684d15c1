//! Payload guard: rejects oversized raw parameters before validation.

use async_trait::async_trait;
use governor_application::{MiddlewareError, MiddlewareParticipant};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

pub const PAYLOAD_GUARD_ORDER: i32 = -200;
pub const PAYLOAD_TOO_LARGE: &str = "PAYLOAD_TOO_LARGE";

/// Fails the invocation with `PAYLOAD_TOO_LARGE` when the serialized raw
/// parameters exceed `max_bytes`.
///
/// Runs before every other built-in participant.
#[derive(Debug, Clone, Copy)]
pub struct PayloadGuardMiddleware {
    max_bytes: usize,
}

impl PayloadGuardMiddleware {
    pub fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }
}

#[async_trait]
impl MiddlewareParticipant for PayloadGuardMiddleware {
    fn name(&self) -> &str {
        "payload_guard"
    }

    fn order(&self) -> i32 {
        PAYLOAD_GUARD_ORDER
    }

    async fn before_execution(
        &self,
        tool_name: &str,
        raw_params: &Value,
        _cancel: &CancellationToken,
    ) -> Result<(), MiddlewareError> {
        let size = match raw_params {
            Value::String(text) => text.len(),
            other => other.to_string().len(),
        };
        if size > self.max_bytes {
            return Err(MiddlewareError::new(
                self.name(),
                format!(
                    "Parameters for '{}' are {} bytes, above the {} byte limit",
                    tool_name, size, self.max_bytes
                ),
            )
            .with_code(PAYLOAD_TOO_LARGE));
        }
        Ok(())
    }
}
