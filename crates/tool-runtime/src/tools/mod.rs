//! Built-in tools, one module per upstream.
//!
//! Every tool runs exactly one façade operation and returns its JSON
//! unchanged; the registry renders and error-wraps the outcome.

pub mod catfacts;
pub mod jokes;
pub mod posts;
pub mod qrcode;
pub mod todos;
pub mod users;

pub use catfacts::{CatFactTool, MultipleCatFactsTool};
pub use jokes::{JokesByTypeTool, RandomJokeTool};
pub use posts::{CommentsTool, CreatePostTool, PostByIdTool, PostsTool};
pub use qrcode::QrCodeTool;
pub use todos::TodosTool;
pub use users::{UserByIdTool, UsersTool};

use serde_json::Value;

/// Item count of an array payload, 1 for anything else.
pub(crate) fn item_count(value: &Value) -> usize {
    value.as_array().map_or(1, Vec::len)
}
