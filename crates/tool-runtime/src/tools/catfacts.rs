use async_trait::async_trait;
use serde_json::{json, Value};

use crate::tool::{opt_i64, ParamSpec, ParamType, Tool, ToolContext, ToolDefinition, ToolError, ToolOutput};

const DEFAULT_FACT_LIMIT: i64 = 5;

/// `get_cat_fact()`
pub struct CatFactTool;

#[async_trait]
impl Tool for CatFactTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new("get_cat_fact", "Fetch a random cat fact.")
    }

    async fn execute(&self, _input: Value, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let fact = ctx.apis.catfacts.get_random_fact().await?;
        ctx.info("Fetched a cat fact");
        Ok(ToolOutput::Json(fact))
    }
}

/// `get_multiple_cat_facts(limit=5)`
///
/// `limit` is forwarded to the upstream as a query parameter; the returned
/// page is not truncated locally.
pub struct MultipleCatFactsTool;

#[async_trait]
impl Tool for MultipleCatFactsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new("get_multiple_cat_facts", "Fetch several cat facts at once.").param(
            ParamSpec::optional("limit", ParamType::Integer, "Number of facts to request")
                .with_default(json!(DEFAULT_FACT_LIMIT)),
        )
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> Result<ToolOutput, ToolError> {
        let limit = opt_i64(&input, "limit")?.unwrap_or(DEFAULT_FACT_LIMIT);
        let limit = u32::try_from(limit)
            .map_err(|_| ToolError::InvalidInput(format!("'limit' must be between 0 and {}", u32::MAX)))?;
        let facts = ctx.apis.catfacts.get_facts(limit).await?;
        ctx.info(format!("Fetched {limit} cat facts"));
        Ok(ToolOutput::Json(facts))
    }
}
