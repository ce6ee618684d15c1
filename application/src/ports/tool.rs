//! Tool port
//!
//! [`Tool`] is what tool authors implement: strongly typed parameters and
//! output, an async body that observes a [`CancellationToken`], and optional
//! per-tool middleware, budget, error catalog and scoped resources.
//!
//! The governor works with [`ErasedTool`], the object-safe view produced by
//! [`erase`]. Erasure is where raw JSON meets the typed world: the raw value
//! is coerced into an argument object, structurally validated against the
//! [`ToolDefinition`], deserialized into `Params`, then checked by the
//! tool's own [`Tool::validate`].

use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::BoxFuture;
use governor_domain::{
    BudgetConfig, DefaultToolValidator, ErrorCatalog, ErrorCode, ToolCall, ToolDefinition,
    ToolValidator, ValidationError, Violation,
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use super::middleware::MiddlewareParticipant;
use super::resource::ResourceLifecycle;

/// Failure raised by a tool body.
#[derive(Error, Debug)]
pub enum ToolFailure {
    #[error("{0}")]
    Execution(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    /// Failure with a tool-declared code such as `FILE_NOT_FOUND`
    #[error("[{code}] {message}")]
    Domain { code: String, message: String },

    /// The body observed the cancellation token and stopped
    #[error("Cancelled")]
    Cancelled,

    #[error("Failed to serialize tool output: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ToolFailure {
    pub fn execution(message: impl Into<String>) -> Self {
        ToolFailure::Execution(message.into())
    }

    pub fn domain(code: impl Into<String>, message: impl Into<String>) -> Self {
        ToolFailure::Domain {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Error code this failure is reported under.
    pub fn code(&self) -> ErrorCode {
        match self {
            ToolFailure::Timeout(_) => ErrorCode::Timeout,
            ToolFailure::Domain { code, .. } => ErrorCode::parse(code),
            _ => ErrorCode::ToolError,
        }
    }

    /// Human-readable cause without the code prefix.
    pub fn detail(&self) -> String {
        match self {
            ToolFailure::Domain { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// A tool as its author writes it.
#[async_trait]
pub trait Tool: Send + Sync + 'static {
    type Params: DeserializeOwned + Serialize + Send + 'static;
    type Output: Serialize + Send + 'static;

    /// Name, category, parameters and declared result shape.
    fn definition(&self) -> ToolDefinition;

    /// Semantic checks on already-deserialized parameters.
    fn validate(&self, _params: &Self::Params) -> Result<(), ValidationError> {
        Ok(())
    }

    async fn invoke(
        &self,
        params: Self::Params,
        cancel: CancellationToken,
    ) -> Result<Self::Output, ToolFailure>;

    /// Participants that only wrap this tool.
    fn middleware(&self) -> Vec<Arc<dyn MiddlewareParticipant>> {
        Vec::new()
    }

    /// Budget this tool prefers over the process default.
    fn budget(&self) -> Option<BudgetConfig> {
        None
    }

    /// Catalog used instead of the governor's when this tool fails.
    fn error_catalog(&self) -> Option<Arc<dyn ErrorCatalog>> {
        None
    }

    /// External handles this tool owns.
    fn resources(&self) -> Option<&ResourceLifecycle> {
        None
    }
}

/// A validated call, ready to run.
pub struct PreparedCall<'a> {
    /// Normalized parameters, used for cost estimation
    pub params: Value,
    body: Box<dyn FnOnce(CancellationToken) -> BoxFuture<'a, Result<Value, ToolFailure>> + Send + 'a>,
}

impl<'a> PreparedCall<'a> {
    pub fn run(self, cancel: CancellationToken) -> BoxFuture<'a, Result<Value, ToolFailure>> {
        (self.body)(cancel)
    }
}

/// Object-safe view of a [`Tool`].
pub trait ErasedTool: Send + Sync {
    fn definition(&self) -> &ToolDefinition;

    fn name(&self) -> &str {
        &self.definition().name
    }

    /// Coerce and validate raw parameters, returning the call to run.
    fn prepare(&self, raw_params: &Value) -> Result<PreparedCall<'_>, ValidationError>;

    fn middleware(&self) -> Vec<Arc<dyn MiddlewareParticipant>>;

    fn budget(&self) -> Option<BudgetConfig>;

    fn error_catalog(&self) -> Option<Arc<dyn ErrorCatalog>>;

    fn resources(&self) -> Option<&ResourceLifecycle>;
}

/// Erase a typed tool so it can be stored next to tools of other types.
pub fn erase<T: Tool>(tool: T) -> Arc<dyn ErasedTool> {
    let definition = tool.definition();
    Arc::new(TypedTool { tool, definition })
}

struct TypedTool<T: Tool> {
    tool: T,
    definition: ToolDefinition,
}

impl<T: Tool> TypedTool<T> {
    /// Returns the coerced argument object alongside the typed params.
    fn decode(&self, raw_params: &Value) -> Result<(Value, T::Params), ValidationError> {
        let call = ToolCall::coerce(&self.definition.name, raw_params)
            .map_err(|reason| ValidationError::single(Violation::invalid("params", reason)))?;

        if !self.definition.skip_validation {
            DefaultToolValidator.validate(&call, &self.definition)?;
        }

        let arguments = call.arguments_value();
        let params = serde_json::from_value(arguments.clone()).map_err(|e| {
            ValidationError::single(Violation::invalid(
                "params",
                format!("Parameters do not match the expected shape: {}", e),
            ))
        })?;
        Ok((arguments, params))
    }
}

impl<T: Tool> ErasedTool for TypedTool<T> {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    fn prepare(&self, raw_params: &Value) -> Result<PreparedCall<'_>, ValidationError> {
        let (arguments, params) = self.decode(raw_params)?;
        self.tool.validate(&params)?;

        // Params that cannot be re-serialized are costed as supplied.
        let normalized = serde_json::to_value(&params).unwrap_or(arguments);
        let tool = &self.tool;
        Ok(PreparedCall {
            params: normalized,
            body: Box::new(move |cancel| {
                async move {
                    let output = tool.invoke(params, cancel).await?;
                    Ok::<Value, ToolFailure>(serde_json::to_value(output)?)
                }
                .boxed()
            }),
        })
    }

    fn middleware(&self) -> Vec<Arc<dyn MiddlewareParticipant>> {
        self.tool.middleware()
    }

    fn budget(&self) -> Option<BudgetConfig> {
        self.tool.budget()
    }

    fn error_catalog(&self) -> Option<Arc<dyn ErrorCatalog>> {
        self.tool.error_catalog()
    }

    fn resources(&self) -> Option<&ResourceLifecycle> {
        self.tool.resources()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use governor_domain::tool::validation::require_positive;
    use governor_domain::{ParamType, ToolCategory, ToolParameter};
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize, Serialize)]
    struct RepeatParams {
        text: String,
        #[serde(default = "one")]
        times: u32,
    }

    fn one() -> u32 {
        1
    }

    struct Repeat;

    #[async_trait]
    impl Tool for Repeat {
        type Params = RepeatParams;
        type Output = String;

        fn definition(&self) -> ToolDefinition {
            ToolDefinition::new("repeat", "Repeat text", ToolCategory::Utility)
                .with_parameter(
                    ToolParameter::new("text", "Text", true).with_type(ParamType::String),
                )
                .with_parameter(
                    ToolParameter::new("times", "Repetitions", false).with_type(ParamType::Integer),
                )
        }

        fn validate(&self, params: &RepeatParams) -> Result<(), ValidationError> {
            require_positive(params.times, "times")
        }

        async fn invoke(
            &self,
            params: RepeatParams,
            _cancel: CancellationToken,
        ) -> Result<String, ToolFailure> {
            Ok(params.text.repeat(params.times as usize))
        }
    }

    #[tokio::test]
    async fn test_prepare_and_run() {
        let tool = erase(Repeat);
        let prepared = tool.prepare(&json!({"text": "ab", "times": 2})).unwrap();
        assert_eq!(prepared.params, json!({"text": "ab", "times": 2}));
        let value = prepared.run(CancellationToken::new()).await.unwrap();
        assert_eq!(value, json!("abab"));
    }

    #[test]
    fn test_normalized_params_include_defaults() {
        let tool = erase(Repeat);
        let prepared = tool.prepare(&json!({"text": "ab"})).unwrap();
        assert_eq!(prepared.params["times"], json!(1));
    }

    #[test]
    fn test_missing_required_is_parameter_required() {
        let tool = erase(Repeat);
        let err = tool.prepare(&json!({})).err().unwrap();
        assert_eq!(err.code(), ErrorCode::ParameterRequired);
    }

    #[test]
    fn test_coercion_failure_is_validation_error() {
        let tool = erase(Repeat);
        let err = tool.prepare(&json!([1, 2])).err().unwrap();
        assert_eq!(err.code(), ErrorCode::ValidationError);
    }

    #[test]
    fn test_typed_validation_runs_after_structural() {
        let tool = erase(Repeat);
        let err = tool.prepare(&json!({"text": "ab", "times": 0})).err().unwrap();
        assert_eq!(err.code(), ErrorCode::ValidationError);
        assert!(err.message().contains("times"));
    }

    struct Opaque;

    #[derive(Deserialize)]
    struct OpaqueParams {
        text: String,
    }

    impl Serialize for OpaqueParams {
        fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("not serializable"))
        }
    }

    #[async_trait]
    impl Tool for Opaque {
        type Params = OpaqueParams;
        type Output = usize;

        fn definition(&self) -> ToolDefinition {
            ToolDefinition::new("opaque", "Count characters", ToolCategory::Utility)
                .with_parameter(
                    ToolParameter::new("text", "Text", true).with_type(ParamType::String),
                )
        }

        async fn invoke(
            &self,
            params: OpaqueParams,
            _cancel: CancellationToken,
        ) -> Result<usize, ToolFailure> {
            Ok(params.text.len())
        }
    }

    #[test]
    fn test_unserializable_params_keep_supplied_arguments() {
        let tool = erase(Opaque);
        let prepared = tool.prepare(&json!({"text": "hello world"})).unwrap();
        assert_eq!(prepared.params, json!({"text": "hello world"}));
    }

    #[test]
    fn test_failure_codes() {
        assert_eq!(ToolFailure::execution("boom").code(), ErrorCode::ToolError);
        assert_eq!(ToolFailure::Timeout("slow".into()).code(), ErrorCode::Timeout);
        let domain = ToolFailure::domain("FILE_NOT_FOUND", "missing.txt");
        assert_eq!(domain.code(), ErrorCode::Domain("FILE_NOT_FOUND".into()));
        assert_eq!(domain.detail(), "missing.txt");
    }
}
