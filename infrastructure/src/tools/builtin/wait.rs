//! `wait`: sleeps, observing cancellation.

use std::time::Duration;

use async_trait::async_trait;
use governor_application::{Tool, ToolFailure};
use governor_domain::{DescribeShape, ParamType, ResultShape, ToolCategory, ToolDefinition, ToolParameter};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

pub const WAIT: &str = "wait";

/// Longest accepted sleep.
pub const MAX_WAIT_MILLIS: u64 = 60_000;

#[derive(Debug, Deserialize, Serialize)]
pub struct WaitParams {
    pub millis: u64,
}

#[derive(Debug, Serialize)]
pub struct WaitResult {
    pub waited_ms: u64,
}

impl DescribeShape for WaitResult {
    fn shape() -> ResultShape {
        ResultShape::record("WaitResult", 1, 0)
    }
}

pub struct WaitTool;

#[async_trait]
impl Tool for WaitTool {
    type Params = WaitParams;
    type Output = WaitResult;

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(WAIT, "Sleep for the given number of milliseconds", ToolCategory::Utility)
            .with_parameter(
                ToolParameter::new("millis", "How long to sleep", true)
                    .with_type(ParamType::Integer)
                    .with_range(0.0, MAX_WAIT_MILLIS as f64),
            )
            .with_result_shape(WaitResult::shape())
    }

    async fn invoke(&self, params: WaitParams, cancel: CancellationToken) -> Result<WaitResult, ToolFailure> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ToolFailure::Cancelled),
            _ = tokio::time::sleep(Duration::from_millis(params.millis)) => Ok(WaitResult {
                waited_ms: params.millis,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use governor_application::erase;
    use governor_domain::ErrorCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_short_wait_completes() {
        let result = WaitTool
            .invoke(WaitParams { millis: 1 }, CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(result.waited_ms, 1);
    }

    #[tokio::test]
    async fn test_cancel_interrupts_sleep() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = WaitTool
            .invoke(WaitParams { millis: MAX_WAIT_MILLIS }, cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolFailure::Cancelled));
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        let tool = erase(WaitTool);
        let err = tool.prepare(&json!({"millis": MAX_WAIT_MILLIS + 1})).err().unwrap();
        assert_eq!(err.code(), ErrorCode::ValidationError);
    }
}
