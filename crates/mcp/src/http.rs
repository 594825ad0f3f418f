//! HTTP transport: one JSON-RPC message per `POST /mcp`.
//!
//! Requests get their response as the JSON body; notifications get
//! `202 Accepted`. Log notifications have no channel back to the client
//! here and are only traced.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::server::McpServer;

/// Build the router for a server.
pub fn router(server: McpServer) -> Router {
    Router::new()
        .route("/mcp", post(handle_mcp))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(server)
}

/// Bind `addr` and serve until `shutdown` resolves.
pub async fn serve(
    server: McpServer,
    addr: &str,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "MCP HTTP transport listening on /mcp");
    axum::serve(listener, router(server))
        .with_graceful_shutdown(shutdown)
        .await?;
    tracing::info!("MCP HTTP transport stopped");
    Ok(())
}

async fn handle_mcp(State(server): State<McpServer>, body: String) -> Response {
    let dispatch = server.handle_message(&body).await;
    for notif in &dispatch.notifications {
        tracing::debug!(params = ?notif.params, "Dropping log notification on HTTP transport");
    }
    match dispatch.response {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

async fn health(State(server): State<McpServer>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "server": server.name(),
    }))
}
