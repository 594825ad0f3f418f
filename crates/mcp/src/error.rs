//! Error types for the MCP crate.

use pubapi_tool_runtime::{CapabilityKind, RegistryError};

use crate::types::{error_codes, JsonRpcError};

/// Errors that can occur during MCP operations.
#[derive(Debug, thiserror::Error)]
pub enum McpError {
    /// Failed to parse JSON.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Well-formed JSON that is not a JSON-RPC message.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Transport I/O error.
    #[error("Transport error: {0}")]
    Transport(#[from] std::io::Error),

    /// The requested method is not supported.
    #[error("Method not found: {0}")]
    MethodNotFound(String),

    /// Invalid parameters for a method.
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// The requested tool was not found in the registry.
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Prompt not found: {0}")]
    PromptNotFound(String),

    /// Anything else the registry reported.
    #[error("{0}")]
    Internal(String),
}

impl McpError {
    /// Convert to a JSON-RPC error object.
    pub fn to_rpc_error(&self) -> JsonRpcError {
        let code = match self {
            McpError::JsonParse(_) => error_codes::PARSE_ERROR,
            McpError::InvalidRequest(_) => error_codes::INVALID_REQUEST,
            McpError::MethodNotFound(_) => error_codes::METHOD_NOT_FOUND,
            McpError::InvalidParams(_) => error_codes::INVALID_PARAMS,
            McpError::ToolNotFound(_) => error_codes::INVALID_PARAMS,
            McpError::PromptNotFound(_) => error_codes::INVALID_PARAMS,
            McpError::ResourceNotFound(_) => error_codes::RESOURCE_NOT_FOUND,
            McpError::Transport(_) | McpError::Internal(_) => error_codes::INTERNAL_ERROR,
        };
        JsonRpcError {
            code,
            message: self.to_string(),
            data: None,
        }
    }
}

impl From<RegistryError> for McpError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound(CapabilityKind::Tool, name) => McpError::ToolNotFound(name),
            RegistryError::NotFound(CapabilityKind::Resource, uri) => McpError::ResourceNotFound(uri),
            RegistryError::NotFound(CapabilityKind::Prompt, name) => McpError::PromptNotFound(name),
            RegistryError::Prompt(e) => McpError::InvalidParams(e.to_string()),
            other => McpError::Internal(other.to_string()),
        }
    }
}
