use async_trait::async_trait;
use serde_json::Value;

use crate::tool::{req_str, ParamSpec, ParamType, Tool, ToolContext, ToolDefinition, ToolError, ToolOutput};

/// `get_random_joke()`
pub struct RandomJokeTool;

#[async_trait]
impl Tool for RandomJokeTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new("get_random_joke", "Fetch a random joke.")
    }

    async fn execute(&self, _input: Value, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let joke = ctx.apis.jokes.get_random_joke().await?;
        ctx.info("Fetched a random joke");
        Ok(ToolOutput::Json(joke))
    }
}

/// `get_jokes_by_type(joke_type)`
pub struct JokesByTypeTool;

#[async_trait]
impl Tool for JokesByTypeTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "get_jokes_by_type",
            "Fetch jokes of a given type (programming, general, knock-knock, ...).",
        )
        .param(ParamSpec::required("joke_type", ParamType::String, "Joke type"))
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let joke_type = req_str(&input, "joke_type")?;
        let jokes = ctx.apis.jokes.get_jokes_by_type(joke_type).await?;
        ctx.info(format!("Fetched jokes of type {joke_type}"));
        Ok(ToolOutput::Json(jokes))
    }
}
