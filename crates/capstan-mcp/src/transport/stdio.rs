//! Stdio transport: one session per process, JSON-RPC over stdin/stdout.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::protocol::ProtocolHandler;
use crate::types::{McpError, McpResult, RequestId};

use super::framing;

/// Stdio transport for desktop MCP clients.
pub struct StdioTransport {
    handler: ProtocolHandler,
}

impl StdioTransport {
    pub fn new(handler: ProtocolHandler) -> Self {
        Self { handler }
    }

    /// Run until stdin closes.
    pub async fn run(&self) -> McpResult<()> {
        let reader = BufReader::new(tokio::io::stdin());
        let writer = tokio::io::stdout();
        self.serve(reader, writer).await
    }

    /// Serve one connection: register a session, answer every line, and
    /// drop the session at EOF.
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> McpResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let session = self.handler.sessions().create().await;
        let session_id = session.id().to_string();
        drop(session);
        tracing::info!(session = %session_id, "Stdio transport started");

        let result = self.pump(&session_id, &mut reader, &mut writer).await;

        if let Some(session) = self.handler.sessions().remove(&session_id).await {
            let snapshot = session.snapshot().await;
            tracing::info!(
                session = %snapshot.id,
                state = ?snapshot.state,
                subscriptions = snapshot.subscriptions.len(),
                "Session closed"
            );
        }
        result
    }

    async fn pump<R, W>(&self, session_id: &str, reader: &mut R, writer: &mut W) -> McpResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut line = String::new();

        loop {
            line.clear();
            let bytes_read = reader.read_line(&mut line).await.map_err(McpError::Io)?;

            if bytes_read == 0 {
                tracing::info!("EOF on stdin, shutting down");
                return Ok(());
            }

            if line.trim().is_empty() {
                continue;
            }

            let response = match framing::parse_message(&line) {
                Ok(msg) => self.handler.handle_message(session_id, msg).await,
                Err(e) => {
                    tracing::warn!("Rejected message: {e}");
                    Some(serde_json::to_value(e.to_json_rpc_error(RequestId::Null))?)
                }
            };

            if let Some(response) = response {
                let framed = framing::frame_message(&response)?;
                writer
                    .write_all(framed.as_bytes())
                    .await
                    .map_err(McpError::Io)?;
                writer.flush().await.map_err(McpError::Io)?;
            }
        }
    }
}
