//! JSONPlaceholder post tools: listing, lookup, comments, and creation.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::item_count;
use crate::tool::{
    opt_i64, opt_id, req_i64, req_id, req_str, ParamSpec, ParamType, Tool, ToolContext,
    ToolDefinition, ToolError, ToolOutput,
};

/// `get_posts(limit?)`
pub struct PostsTool;

#[async_trait]
impl Tool for PostsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new("get_posts", "Fetch posts from JSONPlaceholder.").param(
            ParamSpec::optional(
                "limit",
                ParamType::Integer,
                "Return only the first N posts (all when absent or 0)",
            ),
        )
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let limit = opt_i64(&input, "limit")?;
        debug!(?limit, "get_posts");
        let posts = ctx.apis.jsonplaceholder.get_posts(limit).await?;
        ctx.info(format!("Fetched {} posts", item_count(&posts)));
        Ok(ToolOutput::Json(posts))
    }
}

/// `get_post_by_id(post_id)`
pub struct PostByIdTool;

#[async_trait]
impl Tool for PostByIdTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new("get_post_by_id", "Fetch a single post by its ID.")
            .param(ParamSpec::required("post_id", ParamType::Id, "Post ID"))
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let post_id = req_id(&input, "post_id")?;
        let post = ctx.apis.jsonplaceholder.get_post(&post_id).await?;
        ctx.info(format!("Fetched post {post_id}"));
        Ok(ToolOutput::Json(post))
    }
}

/// `get_comments(post_id?)`
pub struct CommentsTool;

#[async_trait]
impl Tool for CommentsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "get_comments",
            "Fetch comments, either for one post or across all posts.",
        )
        .param(ParamSpec::optional(
            "post_id",
            ParamType::Id,
            "Only comments on this post",
        ))
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let post_id = opt_id(&input, "post_id")?;
        let comments = ctx.apis.jsonplaceholder.get_comments(post_id.as_ref()).await?;
        match &post_id {
            Some(id) => ctx.info(format!("Fetched comments for post {id}")),
            None => ctx.info(format!("Fetched {} comments", item_count(&comments))),
        }
        Ok(ToolOutput::Json(comments))
    }
}

/// `create_post(title, body, user_id)`
///
/// The upstream accepts and echoes the post but does not persist it.
pub struct CreatePostTool;

#[async_trait]
impl Tool for CreatePostTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "create_post",
            "Create a new post (simulated: accepted by the upstream but not persisted).",
        )
        .param(ParamSpec::required("title", ParamType::String, "Post title"))
        .param(ParamSpec::required("body", ParamType::String, "Post body"))
        .param(ParamSpec::required("user_id", ParamType::Integer, "Author's user ID"))
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let title = req_str(&input, "title")?;
        let body = req_str(&input, "body")?;
        let user_id = req_i64(&input, "user_id")?;
        let created = ctx
            .apis
            .jsonplaceholder
            .create_post(title, body, user_id)
            .await?;
        ctx.info("Post created (simulated)");
        Ok(ToolOutput::Json(created))
    }
}
