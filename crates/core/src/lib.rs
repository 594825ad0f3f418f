pub mod config;
pub mod error;

pub use config::{Config, HttpConfig, ServerConfig, Transport, UpstreamConfig};
pub use error::*;
