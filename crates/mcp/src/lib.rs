//! MCP (Model Context Protocol) server for the pubapi capability registry.
//!
//! Implements the MCP protocol over JSON-RPC 2.0, exposing the registered
//! tools, resources, and prompts to MCP clients.
//!
//! # Architecture
//!
//! - **types**: JSON-RPC 2.0 and MCP-specific protocol types
//! - **transport**: Pluggable transport layer (stdio, channels)
//! - **server**: MCP server wrapping a `CapabilityRegistry`
//! - **http**: `POST /mcp` transport on axum
//! - **error**: Unified error types
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use pubapi_apis::ApiManager;
//! use pubapi_core::{HttpConfig, UpstreamConfig};
//! use pubapi_mcp::server::McpServer;
//! use pubapi_mcp::transport::StdioTransport;
//! use pubapi_tool_runtime::default_registry;
//!
//! # async fn example() {
//! let apis = ApiManager::open(&UpstreamConfig::default(), &HttpConfig::default()).unwrap();
//! let registry = default_registry().unwrap();
//! let server = McpServer::new(Arc::new(registry), Arc::new(apis));
//! let mut transport = StdioTransport::new();
//! server.run(&mut transport).await.unwrap();
//! # }
//! ```

pub mod error;
pub mod http;
pub mod server;
pub mod transport;
pub mod types;

pub use error::McpError;
pub use server::{Dispatch, McpServer, DEFAULT_SERVER_NAME};
pub use transport::{ChannelTransport, McpTransport, StdioTransport};
pub use types::*;
