use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown transport '{0}', expected one of: stdio, http")]
    UnknownTransport(String),
}
