//! `echo`: returns the text it was given.

use async_trait::async_trait;
use governor_application::{Tool, ToolFailure};
use governor_domain::{DescribeShape, ParamType, ResultShape, ToolCategory, ToolDefinition, ToolParameter};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

pub const ECHO: &str = "echo";

#[derive(Debug, Deserialize, Serialize)]
pub struct EchoParams {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct EchoResponse {
    pub response: String,
}

impl DescribeShape for EchoResponse {
    fn shape() -> ResultShape {
        ResultShape::record("EchoResponse", 1, 0)
    }
}

pub struct EchoTool;

#[async_trait]
impl Tool for EchoTool {
    type Params = EchoParams;
    type Output = EchoResponse;

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(ECHO, "Echo the given text back", ToolCategory::Utility)
            .with_parameter(
                ToolParameter::new("text", "Text to echo", true).with_type(ParamType::String),
            )
            .with_result_shape(EchoResponse::shape())
    }

    async fn invoke(
        &self,
        params: EchoParams,
        _cancel: CancellationToken,
    ) -> Result<EchoResponse, ToolFailure> {
        Ok(EchoResponse {
            response: format!("You said: {}", params.text),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_echo() {
        let response = EchoTool
            .invoke(
                EchoParams {
                    text: "hi".to_string(),
                },
                CancellationToken::new(),
            )
            .await
            .unwrap();
        assert_eq!(response.response, "You said: hi");
    }

    #[test]
    fn test_definition() {
        let definition = EchoTool.definition();
        assert_eq!(definition.name, ECHO);
        assert!(definition.parameter("text").unwrap().required);
        assert!(definition.result_shape.is_envelope());
    }
}
