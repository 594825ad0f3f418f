//! MCP server implementation.
//!
//! Exposes a `CapabilityRegistry` over the MCP protocol. Each request runs
//! as its own task; responses are written as they complete and matched by
//! JSON-RPC id.

use std::sync::{Arc, RwLock};

use pubapi_apis::ApiManager;
use pubapi_tool_runtime::{
    CapabilityRegistry, InvocationLogger, LogEntry, LogLevel, ToolContext,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::error::McpError;
use crate::transport::McpTransport;
use crate::types::*;

pub use pubapi_core::config::DEFAULT_SERVER_NAME;

/// Everything one incoming message produced, in emission order.
#[derive(Debug, Default)]
pub struct Dispatch {
    /// `notifications/message` entries logged while handling the request.
    pub notifications: Vec<JsonRpcNotification>,
    /// `None` for notifications.
    pub response: Option<JsonRpcResponse>,
}

/// MCP server that bridges a `CapabilityRegistry` to MCP clients.
///
/// Cheap to clone; clones share registry, aggregator, and log level.
#[derive(Clone)]
pub struct McpServer {
    registry: Arc<CapabilityRegistry>,
    apis: Arc<ApiManager>,
    server_name: String,
    server_version: String,
    /// Minimum level forwarded to the client.
    log_level: Arc<RwLock<LogLevel>>,
}

impl McpServer {
    /// Create a new MCP server over the given registry and aggregator.
    pub fn new(registry: Arc<CapabilityRegistry>, apis: Arc<ApiManager>) -> Self {
        Self {
            registry,
            apis,
            server_name: DEFAULT_SERVER_NAME.to_string(),
            server_version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: Arc::new(RwLock::new(LogLevel::Info)),
        }
    }

    /// Set the server name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.server_name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.server_name
    }

    pub fn log_level(&self) -> LogLevel {
        *self
            .log_level
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run the server loop, reading from and writing to the transport.
    ///
    /// Processes JSON-RPC messages until the transport is closed, then waits
    /// for in-flight requests and flushes their responses.
    pub async fn run<T: McpTransport>(&self, transport: &mut T) -> Result<(), McpError> {
        tracing::info!(server = %self.server_name, "MCP server starting");

        let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();
        let mut tasks = JoinSet::new();

        loop {
            tokio::select! {
                incoming = transport.receive() => {
                    let Some(line) = incoming? else {
                        tracing::info!("Transport closed, shutting down");
                        break;
                    };
                    tracing::debug!(message = %line, "Received message");
                    let server = self.clone();
                    let out = out_tx.clone();
                    tasks.spawn(async move {
                        let dispatch = server.handle_message(&line).await;
                        for message in encode(&dispatch) {
                            // Receiver lives until every task has finished.
                            let _ = out.send(message);
                        }
                    });
                }
                Some(message) = out_rx.recv() => {
                    tracing::debug!(response = %message, "Sending message");
                    transport.send(&message).await?;
                }
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                    if let Err(e) = joined {
                        tracing::error!(error = %e, "Request task failed");
                    }
                }
            }
        }

        if !tasks.is_empty() {
            tracing::debug!(pending = tasks.len(), "Draining in-flight requests");
        }
        drop(out_tx);
        while let Some(message) = out_rx.recv().await {
            transport.send(&message).await?;
        }
        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                tracing::error!(error = %e, "Request task failed");
            }
        }

        Ok(())
    }

    /// Handle one raw JSON-RPC message.
    pub async fn handle_message(&self, line: &str) -> Dispatch {
        // Distinguish requests (have "id") from notifications (no "id")
        // by parsing as generic Value first.
        let raw: Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to parse JSON");
                return Dispatch::respond(rejected(McpError::JsonParse(e)));
            }
        };

        if raw.get("id").is_none() {
            match serde_json::from_value::<JsonRpcNotification>(raw) {
                Ok(notif) => self.handle_notification(&notif),
                Err(e) => tracing::warn!(error = %e, "Malformed notification, ignoring"),
            }
            return Dispatch::default();
        }

        let request: JsonRpcRequest = match serde_json::from_value(raw) {
            Ok(req) => req,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to parse JSON-RPC request");
                return Dispatch::respond(rejected(McpError::InvalidRequest(e.to_string())));
            }
        };

        let (logger, mut log_rx) = InvocationLogger::channel(request.method.clone());
        let response = self.dispatch(&request, Some(logger)).await;

        let threshold = self.log_level();
        let mut notifications = Vec::new();
        while let Ok(entry) = log_rx.try_recv() {
            if entry.level >= threshold {
                notifications.push(log_notification(entry));
            }
        }

        Dispatch {
            notifications,
            response: Some(response),
        }
    }

    /// Handle a single JSON-RPC request and produce a response. Log entries
    /// produced along the way are only traced.
    pub async fn handle_request(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        self.dispatch(request, None).await
    }

    async fn dispatch(&self, request: &JsonRpcRequest, logger: Option<InvocationLogger>) -> JsonRpcResponse {
        let id = request.id.clone();
        let params = &request.params;

        let result = match request.method.as_str() {
            "initialize" => self.handle_initialize(params),
            "ping" => Ok(Value::Object(Default::default())),
            "tools/list" => self.handle_list_tools(),
            "tools/call" => self.handle_call_tool(params, logger).await,
            "resources/list" => self.handle_list_resources(),
            "resources/templates/list" => self.handle_list_resource_templates(),
            "resources/read" => self.handle_read_resource(params),
            "prompts/list" => self.handle_list_prompts(),
            "prompts/get" => self.handle_get_prompt(params),
            "logging/setLevel" => self.handle_set_level(params),
            method => {
                tracing::warn!(method = %method, "Unknown method");
                Err(McpError::MethodNotFound(method.to_string()))
            }
        };

        match result {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(err) => JsonRpcResponse::from_error(id, err.to_rpc_error()),
        }
    }

    fn handle_notification(&self, notif: &JsonRpcNotification) {
        match notif.method.as_str() {
            "notifications/initialized" => {
                tracing::info!("Client confirmed initialization");
            }
            "notifications/cancelled" => {
                // In-flight requests run to completion.
                tracing::debug!(params = ?notif.params, "Client cancelled a request");
            }
            method => {
                tracing::debug!(method = %method, "Unknown notification, ignoring");
            }
        }
    }

    fn handle_initialize(&self, params: &Option<Value>) -> Result<Value, McpError> {
        tracing::info!("Handling initialize");
        if let Some(params) = params {
            match serde_json::from_value::<InitializeParams>(params.clone()) {
                Ok(init) => tracing::info!(
                    client = %init.client_info.name,
                    protocol = %init.protocol_version,
                    "Client connected"
                ),
                Err(e) => tracing::debug!(error = %e, "Unrecognised initialize params"),
            }
        }

        to_value(InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability { list_changed: false }),
                resources: Some(ResourcesCapability::default()),
                prompts: Some(PromptsCapability::default()),
                logging: Some(Value::Object(Default::default())),
            },
            server_info: ServerInfo {
                name: self.server_name.clone(),
                version: Some(self.server_version.clone()),
            },
        })
    }

    fn handle_list_tools(&self) -> Result<Value, McpError> {
        tracing::debug!("Handling tools/list");
        let tools = self.registry.list_tools().into_iter().map(ToolInfo::from).collect();
        to_value(ListToolsResult { tools })
    }

    async fn handle_call_tool(
        &self,
        params: &Option<Value>,
        logger: Option<InvocationLogger>,
    ) -> Result<Value, McpError> {
        let call: CallToolParams = parse_params(params)?;
        tracing::debug!(tool = %call.name, "Handling tools/call");

        let mut ctx = ToolContext::new(self.apis.clone());
        if let Some(logger) = logger {
            ctx = ctx.with_logger(logger.named(call.name.clone()));
        }

        let result = self
            .registry
            .call_tool(&call.name, call.arguments, &ctx)
            .await?;
        to_value(CallToolResult::from(result))
    }

    fn handle_list_resources(&self) -> Result<Value, McpError> {
        let resources = self
            .registry
            .list_resources()
            .into_iter()
            .map(ResourceInfo::from)
            .collect();
        to_value(ListResourcesResult { resources })
    }

    fn handle_list_resource_templates(&self) -> Result<Value, McpError> {
        let resource_templates = self
            .registry
            .list_resource_templates()
            .into_iter()
            .map(ResourceTemplateInfo::from)
            .collect();
        to_value(ListResourceTemplatesResult { resource_templates })
    }

    fn handle_read_resource(&self, params: &Option<Value>) -> Result<Value, McpError> {
        let read: ReadResourceParams = parse_params(params)?;
        tracing::debug!(uri = %read.uri, "Handling resources/read");
        let ctx = ToolContext::new(self.apis.clone());
        let contents = self.registry.read_resource(&read.uri, &ctx)?;
        to_value(ReadResourceResult {
            contents: vec![contents.into()],
        })
    }

    fn handle_list_prompts(&self) -> Result<Value, McpError> {
        let prompts = self
            .registry
            .list_prompts()
            .into_iter()
            .map(PromptInfo::from)
            .collect();
        to_value(ListPromptsResult { prompts })
    }

    fn handle_get_prompt(&self, params: &Option<Value>) -> Result<Value, McpError> {
        let get: GetPromptParams = parse_params(params)?;
        tracing::debug!(prompt = %get.name, "Handling prompts/get");
        let rendered = self.registry.get_prompt(&get.name, &get.arguments)?;
        to_value(GetPromptResult {
            description: Some(rendered.description),
            messages: vec![PromptMessage {
                role: "user".to_string(),
                content: ToolContent::Text { text: rendered.text },
            }],
        })
    }

    fn handle_set_level(&self, params: &Option<Value>) -> Result<Value, McpError> {
        let set: SetLevelParams = parse_params(params)?;
        tracing::info!(level = %set.level, "Client set log level");
        *self
            .log_level
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = set.level;
        Ok(Value::Object(Default::default()))
    }
}

impl Dispatch {
    fn respond(response: JsonRpcResponse) -> Self {
        Self {
            notifications: Vec::new(),
            response: Some(response),
        }
    }
}

/// Serialize a dispatch into wire lines: notifications first, then the response.
fn encode(dispatch: &Dispatch) -> Vec<String> {
    let notifications = dispatch.notifications.iter().map(serde_json::to_string);
    let response = dispatch.response.iter().map(serde_json::to_string);
    notifications
        .chain(response)
        .filter_map(|encoded| match encoded {
            Ok(line) => Some(line),
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode message");
                None
            }
        })
        .collect()
}

/// Error response for a message whose id could not be read.
fn rejected(err: McpError) -> JsonRpcResponse {
    JsonRpcResponse::from_error(RpcId::Number(0), err.to_rpc_error())
}

fn log_notification(entry: LogEntry) -> JsonRpcNotification {
    let params = serde_json::to_value(LoggingMessageParams::from(entry)).ok();
    JsonRpcNotification::new("notifications/message", params)
}

fn parse_params<T: DeserializeOwned>(params: &Option<Value>) -> Result<T, McpError> {
    let params = params
        .as_ref()
        .ok_or_else(|| McpError::InvalidParams("missing params".to_string()))?;
    serde_json::from_value(params.clone()).map_err(|e| McpError::InvalidParams(e.to_string()))
}

fn to_value<T: Serialize>(result: T) -> Result<Value, McpError> {
    serde_json::to_value(result).map_err(|e| McpError::Internal(e.to_string()))
}
