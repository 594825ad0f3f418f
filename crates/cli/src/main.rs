mod cli;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use pubapi_apis::ApiManager;
use pubapi_core::{Config, ServerConfig, Transport};
use pubapi_mcp::{McpServer, StdioTransport};
use pubapi_tool_runtime::{default_registry, CapabilityKind, CapabilityRegistry};

use crate::cli::CliArgs;

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    // stdout carries the stdio protocol; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(args.default_log_level())),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    pubapi_core::config::load_dotenv();
    let mut config = match &args.profile {
        Some(profile) => Config::from_lookup(profile, &|key: &str| std::env::var(key).ok()),
        None => Config::from_env(),
    }
    .context("invalid configuration")?;
    args.apply(&mut config);
    config.log_summary();

    let registry = Arc::new(default_registry().context("failed to build capability registry")?);
    info!(
        tools = registry.len(CapabilityKind::Tool),
        resources = registry.len(CapabilityKind::Resource),
        prompts = registry.len(CapabilityKind::Prompt),
        "Capabilities registered"
    );

    let server_config = config.server.clone();
    ApiManager::scoped(&config.upstream, &config.http, |apis| async move {
        serve(server_config, registry, apis).await
    })
    .await?;

    info!("Server stopped");
    Ok(())
}

async fn serve(
    config: ServerConfig,
    registry: Arc<CapabilityRegistry>,
    apis: Arc<ApiManager>,
) -> Result<()> {
    let server = McpServer::new(registry, apis).with_name(config.name.clone());

    match config.transport {
        Transport::Stdio => {
            info!("Serving MCP over stdio");
            let mut transport = StdioTransport::new();
            server.run(&mut transport).await.context("stdio transport failed")?;
        }
        Transport::Http => {
            let addr = config.bind_addr();
            pubapi_mcp::http::serve(server, &addr, shutdown_signal())
                .await
                .with_context(|| format!("HTTP transport on {addr} failed"))?;
        }
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
