use async_trait::async_trait;
use serde_json::Value;

use super::item_count;
use crate::tool::{req_id, ParamSpec, ParamType, Tool, ToolContext, ToolDefinition, ToolError, ToolOutput};

/// `get_users()`
pub struct UsersTool;

#[async_trait]
impl Tool for UsersTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new("get_users", "Fetch all users from JSONPlaceholder.")
    }

    async fn execute(&self, _input: Value, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let users = ctx.apis.jsonplaceholder.get_users().await?;
        ctx.info(format!("Fetched {} users", item_count(&users)));
        Ok(ToolOutput::Json(users))
    }
}

/// `get_user_by_id(user_id)`
pub struct UserByIdTool;

#[async_trait]
impl Tool for UserByIdTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new("get_user_by_id", "Fetch a single user by ID.")
            .param(ParamSpec::required("user_id", ParamType::Id, "User ID"))
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let user_id = req_id(&input, "user_id")?;
        let user = ctx.apis.jsonplaceholder.get_user(&user_id).await?;
        ctx.info(format!("Fetched user {user_id}"));
        Ok(ToolOutput::Json(user))
    }
}
