//! HTTP plumbing for the public APIs exposed by the pubapi MCP server.
//!
//! # Architecture
//!
//! - **http**: the `HttpClient` seam and its reqwest-backed implementation
//! - **jsonplaceholder / catfacts / jokes / qrcode**: one stateless façade per upstream
//! - **manager**: `ApiManager`, the single owner of the shared client
//! - **error**: `ApiError` (`Http` / `Decode`)
//!
//! Façades never catch errors; everything propagates to the capability
//! boundary in `pubapi-tool-runtime`.

pub mod catfacts;
pub mod error;
pub mod http;
pub mod jokes;
pub mod jsonplaceholder;
pub mod manager;
pub mod qrcode;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use catfacts::CatFactsApi;
pub use error::ApiError;
pub use http::{HttpClient, ReqwestClient};
pub use jokes::JokeApi;
pub use jsonplaceholder::JsonPlaceholderApi;
pub use manager::ApiManager;
pub use qrcode::QrCodeApi;
pub use types::ResourceId;
