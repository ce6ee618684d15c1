//! Tool domain entities

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::shape::ResultShape;

/// Category of a tool.
///
/// Categories only select a default cost estimate (see
/// [`CostEstimator`](crate::estimation::CostEstimator)); they never switch
/// behavior anywhere else.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolCategory {
    #[default]
    General,
    Query,
    Analysis,
    Generation,
    Refactoring,
    Validation,
    Documentation,
    Configuration,
    Diagnostics,
    Testing,
    Deployment,
    Security,
    Resources,
    Integration,
    Monitoring,
    Utility,
}

impl ToolCategory {
    pub fn as_str(&self) -> &str {
        match self {
            ToolCategory::General => "general",
            ToolCategory::Query => "query",
            ToolCategory::Analysis => "analysis",
            ToolCategory::Generation => "generation",
            ToolCategory::Refactoring => "refactoring",
            ToolCategory::Validation => "validation",
            ToolCategory::Documentation => "documentation",
            ToolCategory::Configuration => "configuration",
            ToolCategory::Diagnostics => "diagnostics",
            ToolCategory::Testing => "testing",
            ToolCategory::Deployment => "deployment",
            ToolCategory::Security => "security",
            ToolCategory::Resources => "resources",
            ToolCategory::Integration => "integration",
            ToolCategory::Monitoring => "monitoring",
            ToolCategory::Utility => "utility",
        }
    }
}

impl std::fmt::Display for ToolCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// JSON type expected for a parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    #[default]
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
    Any,
}

impl ParamType {
    pub fn as_str(&self) -> &str {
        match self {
            ParamType::String => "string",
            ParamType::Integer => "integer",
            ParamType::Number => "number",
            ParamType::Boolean => "boolean",
            ParamType::Array => "array",
            ParamType::Object => "object",
            ParamType::Any => "any",
        }
    }

    /// Whether a JSON value has this type.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            ParamType::String => value.is_string(),
            ParamType::Integer => value.is_i64() || value.is_u64(),
            ParamType::Number => value.is_number(),
            ParamType::Boolean => value.is_boolean(),
            ParamType::Array => value.is_array(),
            ParamType::Object => value.is_object(),
            ParamType::Any => true,
        }
    }
}

impl std::fmt::Display for ParamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Declared constraints on a single parameter value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterConstraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<usize>,
}

impl ParameterConstraints {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Declared parameter of a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Parameter name
    pub name: String,
    /// Parameter description
    pub description: String,
    /// Whether this parameter is required
    pub required: bool,
    /// Expected JSON type
    pub param_type: ParamType,
    /// Range, length and pattern constraints
    #[serde(default, skip_serializing_if = "ParameterConstraints::is_empty")]
    pub constraints: ParameterConstraints,
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
            param_type: ParamType::String,
            constraints: ParameterConstraints::default(),
        }
    }

    pub fn with_type(mut self, param_type: ParamType) -> Self {
        self.param_type = param_type;
        self
    }

    pub fn with_range(mut self, minimum: f64, maximum: f64) -> Self {
        self.constraints.minimum = Some(minimum);
        self.constraints.maximum = Some(maximum);
        self
    }

    pub fn with_minimum(mut self, minimum: f64) -> Self {
        self.constraints.minimum = Some(minimum);
        self
    }

    pub fn with_length(mut self, min_length: Option<usize>, max_length: Option<usize>) -> Self {
        self.constraints.min_length = min_length;
        self.constraints.max_length = max_length;
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.constraints.pattern = Some(pattern.into());
        self
    }

    pub fn with_min_items(mut self, min_items: usize) -> Self {
        self.constraints.min_items = Some(min_items);
        self
    }
}

/// Definition of a tool exposed to the agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique, stable name used for logging and error correlation
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Category (default-estimate selector)
    pub category: ToolCategory,
    /// Declared parameters
    pub parameters: Vec<ToolParameter>,
    /// Declared shape of the tool's result
    pub result_shape: ResultShape,
    /// When set, structural validation is skipped and the tool reports
    /// malformed input itself
    #[serde(default)]
    pub skip_validation: bool,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        category: ToolCategory,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            category,
            parameters: Vec::new(),
            result_shape: ResultShape::Opaque,
            skip_validation: false,
        }
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn with_result_shape(mut self, shape: ResultShape) -> Self {
        self.result_shape = shape;
        self
    }

    /// Opt out of structural validation.
    pub fn without_validation(mut self) -> Self {
        self.skip_validation = true;
        self
    }

    pub fn parameter(&self, name: &str) -> Option<&ToolParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

/// Snapshot of the tools currently registered with a host.
///
/// Ordered by name so listings and suggestions are deterministic.
#[derive(Debug, Clone, Default)]
pub struct ToolSpec {
    tools: BTreeMap<String, ToolDefinition>,
}

impl ToolSpec {
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    pub fn register(mut self, tool: ToolDefinition) -> Self {
        self.tools.insert(tool.name.clone(), tool);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn all(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// A call to a tool with its raw arguments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Name of the tool to call
    pub tool_name: String,
    /// Arguments, always a JSON object once coerced
    pub arguments: Map<String, Value>,
}

impl ToolCall {
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments: Map::new(),
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    /// Coerce a raw transport value into a call.
    ///
    /// Accepts an object, `null` (no arguments) or a string holding a JSON
    /// object. Anything else is rejected with a human-readable reason.
    pub fn coerce(tool_name: impl Into<String>, raw: &Value) -> Result<Self, String> {
        let tool_name = tool_name.into();
        let arguments = match raw {
            Value::Object(map) => map.clone(),
            Value::Null => Map::new(),
            Value::String(text) => match serde_json::from_str::<Value>(text) {
                Ok(Value::Object(map)) => map,
                Ok(other) => {
                    return Err(format!(
                        "Parameters for tool '{}' must be a JSON object, got {}",
                        tool_name,
                        json_kind(&other)
                    ));
                }
                Err(e) => {
                    return Err(format!(
                        "Parameters for tool '{}' are not valid JSON: {}",
                        tool_name, e
                    ));
                }
            },
            other => {
                return Err(format!(
                    "Parameters for tool '{}' must be a JSON object, got {}",
                    tool_name,
                    json_kind(other)
                ));
            }
        };
        Ok(Self {
            tool_name,
            arguments,
        })
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.arguments.get(key)
    }

    /// Get a string argument
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }

    /// The arguments as a JSON object value.
    pub fn arguments_value(&self) -> Value {
        Value::Object(self.arguments.clone())
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_category_serde_and_display() {
        assert_eq!(ToolCategory::Resources.to_string(), "resources");
        let json = serde_json::to_string(&ToolCategory::Integration).unwrap();
        assert_eq!(json, "\"integration\"");
        assert_eq!(ToolCategory::default(), ToolCategory::General);
    }

    #[test]
    fn test_tool_definition() {
        let tool = ToolDefinition::new("echo", "Echo text back", ToolCategory::Utility)
            .with_parameter(ToolParameter::new("text", "Text to echo", true).with_length(Some(1), None));

        assert_eq!(tool.name, "echo");
        assert_eq!(tool.parameters.len(), 1);
        assert_eq!(tool.parameter("text").unwrap().constraints.min_length, Some(1));
        assert!(!tool.skip_validation);
        assert!(tool.without_validation().skip_validation);
    }

    #[test]
    fn test_tool_spec() {
        let spec = ToolSpec::new()
            .register(ToolDefinition::new("search", "Search", ToolCategory::Query))
            .register(ToolDefinition::new("echo", "Echo", ToolCategory::Utility));

        assert!(spec.contains("echo"));
        assert!(spec.get("unknown").is_none());
        assert_eq!(spec.names().collect::<Vec<_>>(), vec!["echo", "search"]);
        assert_eq!(spec.len(), 2);
    }

    #[test]
    fn test_param_type_accepts() {
        assert!(ParamType::Integer.accepts(&json!(3)));
        assert!(!ParamType::Integer.accepts(&json!(3.5)));
        assert!(ParamType::Number.accepts(&json!(3.5)));
        assert!(ParamType::Any.accepts(&json!(null)));
        assert!(!ParamType::String.accepts(&json!(1)));
    }

    #[test]
    fn test_coerce_object_null_and_string() {
        let call = ToolCall::coerce("echo", &json!({"text": "hi"})).unwrap();
        assert_eq!(call.get_string("text"), Some("hi"));

        let call = ToolCall::coerce("echo", &Value::Null).unwrap();
        assert!(call.arguments.is_empty());

        let call = ToolCall::coerce("echo", &json!("{\"text\": \"hi\"}")).unwrap();
        assert_eq!(call.get_string("text"), Some("hi"));
    }

    #[test]
    fn test_coerce_rejects_non_objects() {
        let err = ToolCall::coerce("echo", &json!([1, 2])).unwrap_err();
        assert!(err.contains("must be a JSON object"));
        assert!(err.contains("array"));

        let err = ToolCall::coerce("echo", &json!("not json")).unwrap_err();
        assert!(err.contains("not valid JSON"));
    }
}
