use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use pubapi_apis::{ApiError, ApiManager};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::logging::{InvocationLogger, LogLevel};

/// JSON type of a declared tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    Integer,
    String,
    /// Path identifier: integer or string, substituted literally.
    Id,
}

impl ParamType {
    fn schema(&self) -> Value {
        match self {
            ParamType::Integer => json!({"type": "integer"}),
            ParamType::String => json!({"type": "string"}),
            ParamType::Id => json!({"type": ["integer", "string"]}),
        }
    }
}

/// One declared parameter of a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    pub kind: ParamType,
    pub description: String,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl ParamSpec {
    pub fn required(name: &str, kind: ParamType, description: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            description: description.to_string(),
            required: true,
            default: None,
        }
    }

    pub fn optional(name: &str, kind: ParamType, description: &str) -> Self {
        Self {
            required: false,
            ..Self::required(name, kind, description)
        }
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.required = false;
        self.default = Some(default);
        self
    }
}

/// Describes a tool's interface for MCP clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique tool name (e.g., "get_posts")
    pub name: String,
    /// Human-readable description for the LLM
    pub description: String,
    /// Declared parameters, in order.
    pub params: Vec<ParamSpec>,
}

impl ToolDefinition {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            params: Vec::new(),
        }
    }

    pub fn param(mut self, param: ParamSpec) -> Self {
        self.params.push(param);
        self
    }

    /// JSON Schema of the expected arguments object.
    pub fn input_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for p in &self.params {
            let mut schema = p.kind.schema();
            if let Value::Object(obj) = &mut schema {
                obj.insert("description".to_string(), Value::String(p.description.clone()));
                if let Some(default) = &p.default {
                    obj.insert("default".to_string(), default.clone());
                }
            }
            properties.insert(p.name.clone(), schema);
            if p.required {
                required.push(Value::String(p.name.clone()));
            }
        }

        let mut schema = json!({
            "type": "object",
            "properties": properties,
        });
        if !required.is_empty() {
            schema["required"] = Value::Array(required);
        }
        schema
    }
}

impl fmt::Display for ToolDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.params.iter().map(|p| p.name.as_str()).collect();
        write!(f, "{}({})", self.name, names.join(", "))
    }
}

/// What a tool produced on success.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    /// Rendered as pretty-printed JSON text.
    Json(Value),
    /// Binary payload, rendered as base64 image content.
    Image { data: Vec<u8>, mime_type: String },
}

/// One block of a tool result as seen by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ResultContent {
    Text(String),
    /// `data` is base64.
    Image { data: String, mime_type: String },
}

/// Result of a tool invocation after the registry boundary.
///
/// Failures are carried as text starting with `Error: ` and `is_error`
/// set; they never surface as a Rust error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: Vec<ResultContent>,
    pub is_error: bool,
}

impl ToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ResultContent::Text(text.into())],
            is_error: false,
        }
    }

    pub fn error(message: impl fmt::Display) -> Self {
        Self {
            content: vec![ResultContent::Text(format!("Error: {message}"))],
            is_error: true,
        }
    }

    /// First text block, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.content.iter().find_map(|c| match c {
            ResultContent::Text(t) => Some(t.as_str()),
            ResultContent::Image { .. } => None,
        })
    }
}

/// Per-invocation context handed to every tool explicitly.
#[derive(Clone)]
pub struct ToolContext {
    /// Shared aggregator; read-only for the lifetime of the server.
    pub apis: Arc<ApiManager>,
    logger: Option<InvocationLogger>,
}

impl ToolContext {
    pub fn new(apis: Arc<ApiManager>) -> Self {
        Self { apis, logger: None }
    }

    pub fn with_logger(mut self, logger: InvocationLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn has_logger(&self) -> bool {
        self.logger.is_some()
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message.into());
    }

    fn log(&self, level: LogLevel, message: String) {
        if let Some(logger) = &self.logger {
            logger.log(level, message);
        }
    }
}

/// All tools implement this trait.
///
/// Tools are object-safe, Send + Sync, and async.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns the tool's definition (name, description, parameters).
    fn definition(&self) -> ToolDefinition;

    /// Execute the tool with the given JSON arguments.
    async fn execute(&self, input: Value, context: &ToolContext) -> Result<ToolOutput, ToolError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("Tool panicked: {0}")]
    Panicked(String),
}

// ── Argument helpers ────────────────────────────────────────────────

fn field<'a>(input: &'a Value, name: &str) -> Option<&'a Value> {
    input.get(name).filter(|v| !v.is_null())
}

/// Optional integer argument. Numeric strings are accepted.
pub fn opt_i64(input: &Value, name: &str) -> Result<Option<i64>, ToolError> {
    match field(input, name) {
        None => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| ToolError::InvalidInput(format!("'{name}' must be an integer"))),
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ToolError::InvalidInput(format!("'{name}' must be an integer"))),
        Some(_) => Err(ToolError::InvalidInput(format!("'{name}' must be an integer"))),
    }
}

pub fn req_i64(input: &Value, name: &str) -> Result<i64, ToolError> {
    opt_i64(input, name)?.ok_or_else(|| ToolError::InvalidInput(format!("missing '{name}' field")))
}

pub fn req_str<'a>(input: &'a Value, name: &str) -> Result<&'a str, ToolError> {
    match field(input, name) {
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(_) => Err(ToolError::InvalidInput(format!("'{name}' must be a string"))),
        None => Err(ToolError::InvalidInput(format!("missing '{name}' field"))),
    }
}

/// Optional path identifier (integer or string).
pub fn opt_id(input: &Value, name: &str) -> Result<Option<pubapi_apis::ResourceId>, ToolError> {
    match field(input, name) {
        None => Ok(None),
        Some(v @ (Value::Number(_) | Value::String(_))) => serde_json::from_value(v.clone())
            .map(Some)
            .map_err(|_| ToolError::InvalidInput(format!("'{name}' must be an integer or string"))),
        Some(_) => Err(ToolError::InvalidInput(format!("'{name}' must be an integer or string"))),
    }
}

pub fn req_id(input: &Value, name: &str) -> Result<pubapi_apis::ResourceId, ToolError> {
    opt_id(input, name)?.ok_or_else(|| ToolError::InvalidInput(format!("missing '{name}' field")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pubapi_apis::ResourceId;

    fn sample() -> ToolDefinition {
        ToolDefinition::new("get_multiple_cat_facts", "Several cat facts")
            .param(
                ParamSpec::optional("limit", ParamType::Integer, "How many facts")
                    .with_default(json!(5)),
            )
            .param(ParamSpec::required("post_id", ParamType::Id, "Post id"))
    }

    #[test]
    fn test_input_schema_shape() {
        let schema = sample().input_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["limit"]["type"], "integer");
        assert_eq!(schema["properties"]["limit"]["default"], 5);
        assert_eq!(schema["properties"]["post_id"]["type"], json!(["integer", "string"]));
        assert_eq!(schema["required"], json!(["post_id"]));
    }

    #[test]
    fn test_schema_omits_required_when_all_optional() {
        let schema = ToolDefinition::new("get_users", "All users").input_schema();
        assert!(schema.get("required").is_none());
        assert_eq!(schema["properties"], json!({}));
    }

    #[test]
    fn test_definition_display_lists_params_in_order() {
        assert_eq!(sample().to_string(), "get_multiple_cat_facts(limit, post_id)");
    }

    #[test]
    fn test_definition_serialization() {
        let json = serde_json::to_string(&sample()).unwrap();
        let roundtrip: ToolDefinition = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.params, sample().params);
    }

    #[test]
    fn test_int_args() {
        let input = json!({"a": 3, "b": "4", "c": null, "d": 1.5, "e": true});
        assert_eq!(opt_i64(&input, "a").unwrap(), Some(3));
        assert_eq!(opt_i64(&input, "b").unwrap(), Some(4));
        assert_eq!(opt_i64(&input, "c").unwrap(), None);
        assert_eq!(opt_i64(&input, "missing").unwrap(), None);
        assert!(opt_i64(&input, "d").is_err());
        assert!(opt_i64(&input, "e").is_err());
        assert!(req_i64(&input, "missing").is_err());
    }

    #[test]
    fn test_id_args_keep_literal_form() {
        let input = json!({"n": 1, "s": "abc", "o": {}});
        assert_eq!(req_id(&input, "n").unwrap(), ResourceId::Int(1));
        assert_eq!(req_id(&input, "s").unwrap(), ResourceId::Str("abc".to_string()));
        assert!(req_id(&input, "o").is_err());
        assert!(opt_id(&input, "x").unwrap().is_none());
    }

    #[test]
    fn test_str_args() {
        let input = json!({"t": "hello", "n": 2});
        assert_eq!(req_str(&input, "t").unwrap(), "hello");
        assert!(matches!(req_str(&input, "n"), Err(ToolError::InvalidInput(_))));
        assert!(matches!(req_str(&input, "x"), Err(ToolError::InvalidInput(_))));
    }

    #[test]
    fn test_error_result_prefix() {
        let result = ToolResult::error(ApiError::http(Some(500), "boom"));
        assert!(result.is_error);
        assert_eq!(result.first_text(), Some("Error: HTTP error: boom"));
    }
}
