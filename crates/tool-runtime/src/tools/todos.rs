use async_trait::async_trait;
use serde_json::Value;

use super::item_count;
use crate::tool::{opt_id, ParamSpec, ParamType, Tool, ToolContext, ToolDefinition, ToolError, ToolOutput};

/// `get_todos(user_id?)`: one user's todos, or all of them.
pub struct TodosTool;

#[async_trait]
impl Tool for TodosTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "get_todos",
            "Fetch todos, optionally only those of a specific user.",
        )
        .param(ParamSpec::optional("user_id", ParamType::Id, "Only todos of this user"))
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let user_id = opt_id(&input, "user_id")?;
        let todos = ctx.apis.jsonplaceholder.get_todos(user_id.as_ref()).await?;
        match &user_id {
            Some(id) => ctx.info(format!("Fetched todos of user {id}")),
            None => ctx.info(format!("Fetched all todos ({} found)", item_count(&todos))),
        }
        Ok(ToolOutput::Json(todos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{logged_context, BASE};
    use pubapi_apis::testing::RecordingClient;
    use serde_json::json;

    #[tokio::test]
    async fn test_flat_url_without_user() {
        let (ctx, client, mut rx) = logged_context(
            RecordingClient::new().with_json(format!("{BASE}/todos"), json!([{"id": 1}, {"id": 2}, {"id": 3}])),
        );
        TodosTool.execute(json!({}), &ctx).await.unwrap();
        assert_eq!(client.calls()[0].url(), "http://fixture/todos");
        assert_eq!(rx.recv().await.unwrap().message, "Fetched all todos (3 found)");
    }

    #[tokio::test]
    async fn test_nested_url_with_user() {
        let (ctx, client, mut rx) = logged_context(
            RecordingClient::new().with_json(format!("{BASE}/users/2/todos"), json!([])),
        );
        TodosTool.execute(json!({"user_id": 2}), &ctx).await.unwrap();
        assert_eq!(client.calls()[0].url(), "http://fixture/users/2/todos");
        assert_eq!(client.call_count(), 1);
        assert_eq!(rx.recv().await.unwrap().message, "Fetched todos of user 2");
    }
}
