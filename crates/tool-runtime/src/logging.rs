//! Invocation log sink.
//!
//! A tool invocation may carry an [`InvocationLogger`]. Entries sent to it
//! are delivered to whoever holds the receiving end (the MCP server turns
//! them into `notifications/message`). Without a logger, entries are only
//! traced.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Syslog-style severities used by MCP logging, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Notice,
    Warning,
    Error,
    Critical,
    Alert,
    Emergency,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Notice => "notice",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
            LogLevel::Critical => "critical",
            LogLevel::Alert => "alert",
            LogLevel::Emergency => "emergency",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.to_ascii_lowercase()))
            .map_err(|_| format!("unknown log level '{s}'"))
    }
}

/// One structured log entry produced during an invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    /// Capability that produced the entry.
    pub logger: String,
    pub message: String,
}

/// Sending half of an invocation's log sink.
#[derive(Debug, Clone)]
pub struct InvocationLogger {
    logger: String,
    tx: mpsc::UnboundedSender<LogEntry>,
}

impl InvocationLogger {
    pub fn new(logger: impl Into<String>, tx: mpsc::UnboundedSender<LogEntry>) -> Self {
        Self {
            logger: logger.into(),
            tx,
        }
    }

    /// Create a logger together with the receiver its entries arrive on.
    pub fn channel(logger: impl Into<String>) -> (Self, mpsc::UnboundedReceiver<LogEntry>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(logger, tx), rx)
    }

    /// Same sink, different logger name.
    pub fn named(&self, logger: impl Into<String>) -> Self {
        Self {
            logger: logger.into(),
            tx: self.tx.clone(),
        }
    }

    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        let entry = LogEntry {
            level,
            logger: self.logger.clone(),
            message: message.into(),
        };
        tracing::debug!(logger = %entry.logger, level = %entry.level, message = %entry.message, "invocation log");
        // Receiver gone means the client is gone; nothing left to tell.
        let _ = self.tx.send(entry);
    }
}
