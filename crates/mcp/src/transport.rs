//! MCP transport layer.
//!
//! Defines the `McpTransport` trait for sending/receiving JSON-RPC messages,
//! and provides a `StdioTransport` implementation for stdio-based communication.

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use crate::error::McpError;

/// Trait for MCP message transport.
///
/// `receive` must be cancel-safe: the server polls it inside `select!`
/// alongside outgoing messages.
#[async_trait]
pub trait McpTransport: Send {
    /// Read the next JSON-RPC message line from the transport.
    /// Returns `None` when the transport is closed.
    async fn receive(&mut self) -> Result<Option<String>, McpError>;

    /// Write a JSON-RPC message line to the transport.
    async fn send(&mut self, message: &str) -> Result<(), McpError>;
}

/// Newline-delimited JSON over a reader/writer pair (stdin/stdout by default).
///
/// Lines are read by a background task and handed over through a channel,
/// which keeps `receive` cancel-safe.
pub struct StdioTransport<W = tokio::io::Stdout> {
    lines: mpsc::Receiver<Result<String, std::io::Error>>,
    writer: W,
}

impl StdioTransport {
    /// Create a new stdio transport.
    pub fn new() -> Self {
        Self::with_io(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl Default for StdioTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl<W> StdioTransport<W>
where
    W: AsyncWrite + Unpin + Send,
{
    /// Transport over arbitrary I/O; used with in-memory pipes in tests.
    pub fn with_io<R>(reader: R, writer: W) -> Self
    where
        R: AsyncBufRead + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(32);
        tokio::spawn(read_lines(reader, tx));
        Self { lines: rx, writer }
    }
}

async fn read_lines<R>(reader: R, tx: mpsc::Sender<Result<String, std::io::Error>>)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if tx.send(Ok(trimmed.to_string())).await.is_err() {
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                let _ = tx.send(Err(e)).await;
                break;
            }
        }
    }
}

#[async_trait]
impl<W> McpTransport for StdioTransport<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn receive(&mut self) -> Result<Option<String>, McpError> {
        match self.lines.recv().await {
            Some(Ok(line)) => Ok(Some(line)),
            Some(Err(e)) => Err(e.into()),
            None => Ok(None), // EOF
        }
    }

    async fn send(&mut self, message: &str) -> Result<(), McpError> {
        self.writer.write_all(message.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }
}

/// In-memory transport for testing, backed by channel pairs.
pub struct ChannelTransport {
    rx: mpsc::Receiver<String>,
    tx: mpsc::Sender<String>,
}

impl ChannelTransport {
    /// Create a pair of connected transports for testing.
    ///
    /// Messages sent on one transport are received by the other.
    pub fn pair() -> (Self, Self) {
        let (tx_a, rx_b) = mpsc::channel(32);
        let (tx_b, rx_a) = mpsc::channel(32);
        (
            Self { rx: rx_a, tx: tx_a },
            Self { rx: rx_b, tx: tx_b },
        )
    }

    /// Split into the sending and receiving halves.
    pub fn into_parts(self) -> (mpsc::Sender<String>, mpsc::Receiver<String>) {
        (self.tx, self.rx)
    }
}

#[async_trait]
impl McpTransport for ChannelTransport {
    async fn receive(&mut self) -> Result<Option<String>, McpError> {
        Ok(self.rx.recv().await)
    }

    async fn send(&mut self, message: &str) -> Result<(), McpError> {
        self.tx
            .send(message.to_string())
            .await
            .map_err(|e| McpError::Transport(std::io::Error::new(std::io::ErrorKind::BrokenPipe, e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_channel_transport_pair() {
        let (mut a, mut b) = ChannelTransport::pair();

        a.send("hello from a").await.unwrap();
        let msg = b.receive().await.unwrap();
        assert_eq!(msg, Some("hello from a".to_string()));

        b.send("hello from b").await.unwrap();
        let msg = a.receive().await.unwrap();
        assert_eq!(msg, Some("hello from b".to_string()));
    }

    #[tokio::test]
    async fn test_channel_transport_closed() {
        let (mut a, b) = ChannelTransport::pair();
        drop(b);
        let result = a.receive().await.unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_stdio_skips_blank_lines_and_ends_at_eof() {
        let input: &[u8] = b"{\"a\":1}\n\n   \n{\"b\":2}\n";
        let mut transport = StdioTransport::with_io(input, Vec::new());

        assert_eq!(transport.receive().await.unwrap().as_deref(), Some("{\"a\":1}"));
        assert_eq!(transport.receive().await.unwrap().as_deref(), Some("{\"b\":2}"));
        assert_eq!(transport.receive().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_stdio_send_is_newline_delimited() {
        let mut transport = StdioTransport::with_io(&b""[..], Vec::new());
        transport.send("{\"x\":1}").await.unwrap();
        transport.send("{\"y\":2}").await.unwrap();
        assert_eq!(transport.writer, b"{\"x\":1}\n{\"y\":2}\n".to_vec());
    }
}
