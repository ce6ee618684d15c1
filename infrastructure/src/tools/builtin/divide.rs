//! `divide`: floating point division.

use async_trait::async_trait;
use governor_application::{Tool, ToolFailure};
use governor_domain::{DescribeShape, ParamType, ToolCategory, ToolDefinition, ToolParameter};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

pub const DIVIDE: &str = "divide";

#[derive(Debug, Deserialize, Serialize)]
pub struct DivideParams {
    pub a: f64,
    pub b: f64,
}

pub struct DivideTool;

#[async_trait]
impl Tool for DivideTool {
    type Params = DivideParams;
    type Output = f64;

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(DIVIDE, "Divide a by b", ToolCategory::Utility)
            .with_parameter(ToolParameter::new("a", "Dividend", true).with_type(ParamType::Number))
            .with_parameter(ToolParameter::new("b", "Divisor", true).with_type(ParamType::Number))
            .with_result_shape(f64::shape())
    }

    async fn invoke(&self, params: DivideParams, _cancel: CancellationToken) -> Result<f64, ToolFailure> {
        if params.b == 0.0 {
            return Err(ToolFailure::execution("Division by zero"));
        }
        Ok(params.a / params.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_divide() {
        let quotient = DivideTool
            .invoke(DivideParams { a: 10.0, b: 4.0 }, CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(quotient, 2.5);
    }

    #[tokio::test]
    async fn test_division_by_zero_fails() {
        let err = DivideTool
            .invoke(DivideParams { a: 10.0, b: 0.0 }, CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Division by zero");
    }
}
