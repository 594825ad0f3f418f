use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use base64::Engine as _;
use futures::FutureExt;
use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, warn};

use crate::prompt::{Prompt, PromptDefinition, PromptError, RenderedPrompt};
use crate::resource::{Resource, ResourceContents, ResourceDefinition, ResourceError, UriTemplate};
use crate::tool::{ResultContent, Tool, ToolContext, ToolDefinition, ToolError, ToolOutput, ToolResult};

/// Kind of a registered capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapabilityKind {
    Tool,
    Resource,
    Prompt,
}

impl std::fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CapabilityKind::Tool => f.write_str("tool"),
            CapabilityKind::Resource => f.write_str("resource"),
            CapabilityKind::Prompt => f.write_str("prompt"),
        }
    }
}

struct TemplatedResource {
    template: UriTemplate,
    resource: Arc<dyn Resource>,
}

/// Tools, resources, and prompts by (kind, name).
///
/// Populated once at startup and read-only afterwards; share it behind an
/// `Arc`. Listing preserves registration order.
pub struct CapabilityRegistry {
    tools: IndexMap<String, Arc<dyn Tool>>,
    /// Static resources keyed by exact URI.
    resources: IndexMap<String, Arc<dyn Resource>>,
    /// Templated resources keyed by template string, tried in order.
    templates: IndexMap<String, TemplatedResource>,
    prompts: IndexMap<String, Arc<dyn Prompt>>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self {
            tools: IndexMap::new(),
            resources: IndexMap::new(),
            templates: IndexMap::new(),
            prompts: IndexMap::new(),
        }
    }

    /// Register a tool. Returns error if name already registered.
    pub fn register_tool(&mut self, tool: impl Tool + 'static) -> Result<(), RegistryError> {
        let def = tool.definition();
        if self.tools.contains_key(&def.name) {
            return Err(RegistryError::DuplicateName(CapabilityKind::Tool, def.name));
        }
        self.tools.insert(def.name, Arc::new(tool));
        Ok(())
    }

    /// Register a resource under its static URI or URI template.
    pub fn register_resource(&mut self, resource: impl Resource + 'static) -> Result<(), RegistryError> {
        let def = resource.definition();
        let template = UriTemplate::parse(&def.uri).map_err(RegistryError::InvalidTemplate)?;
        if self.resources.contains_key(&def.uri) || self.templates.contains_key(&def.uri) {
            return Err(RegistryError::DuplicateName(CapabilityKind::Resource, def.uri));
        }
        let resource: Arc<dyn Resource> = Arc::new(resource);
        if template.is_templated() {
            self.templates
                .insert(def.uri, TemplatedResource { template, resource });
        } else {
            self.resources.insert(def.uri, resource);
        }
        Ok(())
    }

    pub fn register_prompt(&mut self, prompt: impl Prompt + 'static) -> Result<(), RegistryError> {
        let def = prompt.definition();
        if self.prompts.contains_key(&def.name) {
            return Err(RegistryError::DuplicateName(CapabilityKind::Prompt, def.name));
        }
        self.prompts.insert(def.name, Arc::new(prompt));
        Ok(())
    }

    /// Look up a tool by name.
    pub fn get_tool(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn contains(&self, kind: CapabilityKind, name: &str) -> bool {
        match kind {
            CapabilityKind::Tool => self.tools.contains_key(name),
            CapabilityKind::Resource => {
                self.resources.contains_key(name) || self.templates.contains_key(name)
            }
            CapabilityKind::Prompt => self.prompts.contains_key(name),
        }
    }

    pub fn list_tools(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.definition()).collect()
    }

    /// Static resources only; see [`Self::list_resource_templates`].
    pub fn list_resources(&self) -> Vec<ResourceDefinition> {
        self.resources.values().map(|r| r.definition()).collect()
    }

    pub fn list_resource_templates(&self) -> Vec<ResourceDefinition> {
        self.templates.values().map(|t| t.resource.definition()).collect()
    }

    pub fn list_prompts(&self) -> Vec<PromptDefinition> {
        self.prompts.values().map(|p| p.definition()).collect()
    }

    /// Number of registered capabilities of one kind.
    pub fn len(&self, kind: CapabilityKind) -> usize {
        match kind {
            CapabilityKind::Tool => self.tools.len(),
            CapabilityKind::Resource => self.resources.len() + self.templates.len(),
            CapabilityKind::Prompt => self.prompts.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
            && self.resources.is_empty()
            && self.templates.is_empty()
            && self.prompts.is_empty()
    }

    /// Invoke a tool.
    ///
    /// Only an unknown name is reported as `Err`. Every failure of the tool
    /// itself (bad arguments, upstream errors, even a panic) comes back as
    /// an `Ok` result with `is_error` set and an `Error: ...` text, after an
    /// error entry has been sent to the invocation's logger.
    pub async fn call_tool(
        &self,
        name: &str,
        input: Value,
        ctx: &ToolContext,
    ) -> Result<ToolResult, RegistryError> {
        let tool = self
            .get_tool(name)
            .ok_or_else(|| RegistryError::NotFound(CapabilityKind::Tool, name.to_string()))?;

        debug!(tool = %name, "calling tool");
        let outcome = AssertUnwindSafe(tool.execute(input, ctx))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(ToolError::Panicked(panic_message(panic.as_ref()))));

        let result = match outcome {
            Ok(output) => render_output(output),
            Err(e) => Err(e),
        };

        Ok(match result {
            Ok(result) => result,
            Err(e) => {
                warn!(tool = %name, error = %e, "tool failed");
                ctx.error(format!("{name} failed: {e}"));
                ToolResult::error(e)
            }
        })
    }

    /// Read a resource by exact static URI, falling back to templates.
    pub fn read_resource(&self, uri: &str, ctx: &ToolContext) -> Result<ResourceContents, RegistryError> {
        let upstream = ctx.apis.upstream();
        let (resource, params) = if let Some(resource) = self.resources.get(uri) {
            (resource.clone(), HashMap::new())
        } else {
            self.templates
                .values()
                .find_map(|t| t.template.matches(uri).map(|p| (t.resource.clone(), p)))
                .ok_or_else(|| RegistryError::NotFound(CapabilityKind::Resource, uri.to_string()))?
        };

        debug!(uri = %uri, "reading resource");
        let def = resource.definition();
        let text = resource.read(&params, upstream)?;
        Ok(ResourceContents {
            uri: uri.to_string(),
            mime_type: def.mime_type,
            text,
        })
    }

    /// Render a prompt after checking its required arguments.
    pub fn get_prompt(
        &self,
        name: &str,
        args: &HashMap<String, String>,
    ) -> Result<RenderedPrompt, RegistryError> {
        let prompt = self
            .prompts
            .get(name)
            .ok_or_else(|| RegistryError::NotFound(CapabilityKind::Prompt, name.to_string()))?;

        let def = prompt.definition();
        if let Some(missing) = def
            .arguments
            .iter()
            .find(|a| a.required && !args.contains_key(&a.name))
        {
            return Err(PromptError::MissingArgument(missing.name.clone()).into());
        }

        debug!(prompt = %name, "rendering prompt");
        Ok(RenderedPrompt {
            description: def.description,
            text: prompt.render(args)?,
        })
    }
}

impl Default for CapabilityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn render_output(output: ToolOutput) -> Result<ToolResult, ToolError> {
    match output {
        ToolOutput::Json(value) => {
            let text = serde_json::to_string_pretty(&value)
                .map_err(|e| ToolError::InvalidInput(format!("JSON serialization failed: {e}")))?;
            Ok(ToolResult::text(text))
        }
        ToolOutput::Image { data, mime_type } => Ok(ToolResult {
            content: vec![ResultContent::Image {
                data: base64::engine::general_purpose::STANDARD.encode(data),
                mime_type,
            }],
            is_error: false,
        }),
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("A {0} named '{1}' is already registered")]
    DuplicateName(CapabilityKind, String),
    #[error("Invalid URI template: {0}")]
    InvalidTemplate(String),
    #[error("Unknown {0}: {1}")]
    NotFound(CapabilityKind, String),
    #[error(transparent)]
    Prompt(#[from] PromptError),
    #[error(transparent)]
    Resource(#[from] ResourceError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{InvocationLogger, LogLevel};
    use crate::prompt::{required_arg, PromptArgument};
    use crate::resource::UriParams;
    use crate::tool::{ParamSpec, ParamType};
    use async_trait::async_trait;
    use pubapi_apis::testing::RecordingClient;
    use pubapi_apis::{ApiError, ApiManager};
    use pubapi_core::UpstreamConfig;
    use serde_json::json;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition::new("echo", "Echoes back the input message.")
                .param(ParamSpec::required("message", ParamType::String, "The message"))
        }

        async fn execute(&self, input: Value, _ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
            let message = crate::tool::req_str(&input, "message")?;
            Ok(ToolOutput::Json(json!({ "echo": message })))
        }
    }

    struct FailingTool;

    #[async_trait]
    impl Tool for FailingTool {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition::new("fail", "Always fails upstream.")
        }

        async fn execute(&self, _input: Value, _ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
            Err(ApiError::http(Some(503), "503 Service Unavailable").into())
        }
    }

    struct PanickingTool;

    #[async_trait]
    impl Tool for PanickingTool {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition::new("panic", "Panics.")
        }

        async fn execute(&self, _input: Value, _ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
            panic!("kaboom")
        }
    }

    struct Descriptor(&'static str);

    impl Resource for Descriptor {
        fn definition(&self) -> ResourceDefinition {
            ResourceDefinition::json(self.0, self.0, "test descriptor")
        }

        fn read(&self, params: &UriParams, _upstream: &UpstreamConfig) -> Result<String, ResourceError> {
            Ok(serde_json::to_string(&json!({ "template": self.0, "params": params }))?)
        }
    }

    struct Greeting;

    impl Prompt for Greeting {
        fn definition(&self) -> PromptDefinition {
            PromptDefinition::new("greet", "Greets someone")
                .argument(PromptArgument::required("who", "Name to greet"))
        }

        fn render(&self, args: &HashMap<String, String>) -> Result<String, PromptError> {
            Ok(format!("Hello, {}!", required_arg(args, "who")?))
        }
    }

    fn context() -> (ToolContext, Arc<RecordingClient>) {
        let client = Arc::new(RecordingClient::new());
        let apis = ApiManager::with_client(client.clone(), &UpstreamConfig::default());
        (ToolContext::new(Arc::new(apis)), client)
    }

    fn registry() -> CapabilityRegistry {
        let mut reg = CapabilityRegistry::new();
        reg.register_tool(EchoTool).unwrap();
        reg.register_tool(FailingTool).unwrap();
        reg.register_tool(PanickingTool).unwrap();
        reg.register_resource(Descriptor("posts://all")).unwrap();
        reg.register_resource(Descriptor("posts://{post_id}")).unwrap();
        reg.register_prompt(Greeting).unwrap();
        reg
    }

    #[test]
    fn test_register_and_lookup() {
        let reg = registry();
        assert_eq!(reg.len(CapabilityKind::Tool), 3);
        assert_eq!(reg.len(CapabilityKind::Resource), 2);
        assert_eq!(reg.len(CapabilityKind::Prompt), 1);
        assert!(reg.get_tool("echo").is_some());
        assert!(reg.get_tool("nonexistent").is_none());
        assert!(reg.contains(CapabilityKind::Resource, "posts://{post_id}"));
        assert!(!reg.contains(CapabilityKind::Prompt, "echo"));
    }

    #[test]
    fn test_duplicate_registration() {
        let mut reg = registry();
        assert!(matches!(
            reg.register_tool(EchoTool),
            Err(RegistryError::DuplicateName(CapabilityKind::Tool, _))
        ));
        assert!(reg.register_resource(Descriptor("posts://all")).is_err());
        assert!(reg.register_prompt(Greeting).is_err());
    }

    #[test]
    fn test_invalid_template_rejected() {
        let mut reg = CapabilityRegistry::new();
        assert!(matches!(
            reg.register_resource(Descriptor("posts://{oops")),
            Err(RegistryError::InvalidTemplate(_))
        ));
    }

    #[test]
    fn test_listing_keeps_registration_order() {
        let reg = registry();
        let names: Vec<String> = reg.list_tools().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["echo", "fail", "panic"]);
        assert_eq!(reg.list_resources()[0].uri, "posts://all");
        assert_eq!(reg.list_resource_templates()[0].uri, "posts://{post_id}");
    }

    #[tokio::test]
    async fn test_call_tool_success() {
        let (ctx, _) = context();
        let result = registry()
            .call_tool("echo", json!({"message": "hi"}), &ctx)
            .await
            .unwrap();
        assert!(!result.is_error);
        let parsed: Value = serde_json::from_str(result.first_text().unwrap()).unwrap();
        assert_eq!(parsed, json!({"echo": "hi"}));
    }

    #[tokio::test]
    async fn test_call_tool_unknown_name_is_err() {
        let (ctx, _) = context();
        let err = registry().call_tool("nope", json!({}), &ctx).await.unwrap_err();
        assert!(matches!(err, RegistryError::NotFound(CapabilityKind::Tool, _)));
    }

    #[tokio::test]
    async fn test_upstream_failure_becomes_error_text_and_log() {
        let (ctx, _) = context();
        let (logger, mut rx) = InvocationLogger::channel("fail");
        let ctx = ctx.with_logger(logger);

        let result = registry().call_tool("fail", json!({}), &ctx).await.unwrap();
        assert!(result.is_error);
        let text = result.first_text().unwrap();
        assert!(text.starts_with("Error: "));
        assert!(text.contains("503 Service Unavailable"));

        let entry = rx.recv().await.unwrap();
        assert_eq!(entry.level, LogLevel::Error);
        assert!(entry.message.contains("503"));
    }

    #[tokio::test]
    async fn test_invalid_arguments_become_error_text() {
        let (ctx, _) = context();
        let result = registry().call_tool("echo", json!({}), &ctx).await.unwrap();
        assert!(result.is_error);
        assert!(result.first_text().unwrap().contains("missing 'message' field"));
    }

    #[tokio::test]
    async fn test_panic_is_contained() {
        let (ctx, _) = context();
        let result = registry().call_tool("panic", json!({}), &ctx).await.unwrap();
        assert!(result.is_error);
        assert!(result.first_text().unwrap().contains("kaboom"));
    }

    #[test]
    fn test_static_uri_wins_over_template() {
        let (ctx, _) = context();
        let contents = registry().read_resource("posts://all", &ctx).unwrap();
        let parsed: Value = serde_json::from_str(&contents.text).unwrap();
        assert_eq!(parsed["template"], "posts://all");
        assert_eq!(contents.mime_type, "application/json");
    }

    #[test]
    fn test_template_resource_receives_params() {
        let (ctx, client) = context();
        let contents = registry().read_resource("posts://42", &ctx).unwrap();
        let parsed: Value = serde_json::from_str(&contents.text).unwrap();
        assert_eq!(parsed["template"], "posts://{post_id}");
        assert_eq!(parsed["params"]["post_id"], "42");
        assert_eq!(contents.uri, "posts://42");
        assert_eq!(client.call_count(), 0);
    }

    #[test]
    fn test_unknown_resource() {
        let (ctx, _) = context();
        assert!(matches!(
            registry().read_resource("users://all", &ctx),
            Err(RegistryError::NotFound(CapabilityKind::Resource, _))
        ));
    }

    #[test]
    fn test_prompt_rendering_and_missing_argument() {
        let reg = registry();
        let mut args = HashMap::new();
        assert!(matches!(
            reg.get_prompt("greet", &args),
            Err(RegistryError::Prompt(PromptError::MissingArgument(ref name))) if name == "who"
        ));

        args.insert("who".to_string(), "Sam".to_string());
        let rendered = reg.get_prompt("greet", &args).unwrap();
        assert_eq!(rendered.text, "Hello, Sam!");
        assert_eq!(rendered.description, "Greets someone");
        assert!(reg.get_prompt("other", &args).is_err());
    }
}
