//! Capability layer of the pubapi MCP server.
//!
//! Tools, resources, and prompts are registered once at startup in a
//! [`CapabilityRegistry`]; the registry is the only place where tool
//! failures are caught and turned into `Error: ...` results.

pub mod defaults;
pub mod logging;
pub mod prompt;
pub mod prompts;
pub mod registry;
pub mod resource;
pub mod resources;
pub mod tool;
pub mod tools;

pub use defaults::default_registry;
pub use logging::{InvocationLogger, LogEntry, LogLevel};
pub use prompt::{Prompt, PromptArgument, PromptDefinition, PromptError, RenderedPrompt};
pub use registry::{CapabilityKind, CapabilityRegistry, RegistryError};
pub use resource::{Resource, ResourceContents, ResourceDefinition, ResourceError, UriTemplate};
pub use tool::{
    ParamSpec, ParamType, ResultContent, Tool, ToolContext, ToolDefinition, ToolError, ToolOutput,
    ToolResult,
};
