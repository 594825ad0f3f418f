//! The server's registration list.

use crate::prompts::{AnalyzePostPrompt, DailyInspirationPrompt, UserProfileAnalysisPrompt};
use crate::registry::{CapabilityRegistry, RegistryError};
use crate::resources::{AllPostsResource, AllUsersResource, ApiStatusResource, PostResource};
use crate::tools::{
    CatFactTool, CommentsTool, CreatePostTool, JokesByTypeTool, MultipleCatFactsTool,
    PostByIdTool, PostsTool, QrCodeTool, RandomJokeTool, TodosTool, UserByIdTool, UsersTool,
};

/// Build the registry with every built-in tool, resource and prompt.
pub fn default_registry() -> Result<CapabilityRegistry, RegistryError> {
    let mut registry = CapabilityRegistry::new();

    registry.register_resource(AllPostsResource)?;
    registry.register_resource(PostResource)?;
    registry.register_resource(AllUsersResource)?;
    registry.register_resource(ApiStatusResource)?;

    registry.register_tool(PostsTool)?;
    registry.register_tool(PostByIdTool)?;
    registry.register_tool(UsersTool)?;
    registry.register_tool(UserByIdTool)?;
    registry.register_tool(TodosTool)?;
    registry.register_tool(CreatePostTool)?;
    registry.register_tool(CommentsTool)?;
    registry.register_tool(CatFactTool)?;
    registry.register_tool(MultipleCatFactsTool)?;
    registry.register_tool(RandomJokeTool)?;
    registry.register_tool(JokesByTypeTool)?;
    registry.register_tool(QrCodeTool)?;

    registry.register_prompt(AnalyzePostPrompt)?;
    registry.register_prompt(UserProfileAnalysisPrompt)?;
    registry.register_prompt(DailyInspirationPrompt)?;

    Ok(registry)
}
