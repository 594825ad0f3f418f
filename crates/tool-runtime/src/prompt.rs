//! Prompts: canned instructional text, optionally parameterized. No I/O.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Prompt template argument definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptArgument {
    pub name: String,
    pub description: String,
    pub required: bool,
}

impl PromptArgument {
    pub fn required(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            required: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptDefinition {
    pub name: String,
    pub description: String,
    pub arguments: Vec<PromptArgument>,
}

impl PromptDefinition {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            arguments: Vec::new(),
        }
    }

    pub fn argument(mut self, argument: PromptArgument) -> Self {
        self.arguments.push(argument);
        self
    }
}

/// Prompt text together with the description it was rendered from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedPrompt {
    pub description: String,
    pub text: String,
}

pub trait Prompt: Send + Sync {
    fn definition(&self) -> PromptDefinition;

    /// Render the prompt. Required arguments are checked by the registry
    /// before this is called.
    fn render(&self, args: &HashMap<String, String>) -> Result<String, PromptError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PromptError {
    #[error("Missing required argument: {0}")]
    MissingArgument(String),
}

/// Fetch an argument the definition declares as required.
pub fn required_arg<'a>(args: &'a HashMap<String, String>, name: &str) -> Result<&'a str, PromptError> {
    args.get(name)
        .map(String::as_str)
        .ok_or_else(|| PromptError::MissingArgument(name.to_string()))
}
