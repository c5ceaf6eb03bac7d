//! Local transport: newline-delimited JSON-RPC over stdin/stdout.
//!
//! Each message is handled on its own task so a long-running tool call does
//! not hold up `ping` or other calls. Responses are written by a single
//! writer, one JSON document per line, in completion order.

use std::io;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::mcp::McpServer;

/// Serve the process's stdin/stdout until stdin closes.
pub async fn serve_stdio(server: Arc<McpServer>) -> io::Result<()> {
    info!("Serving MCP over stdio");
    serve(server, tokio::io::stdin(), tokio::io::stdout()).await
}

/// Serve any reader/writer pair until the reader is exhausted and every
/// in-flight request has answered.
pub async fn serve<R, W>(server: Arc<McpServer>, reader: R, mut writer: W) -> io::Result<()>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let reader_task = tokio::spawn(read_loop(server, reader, tx));

    while let Some(line) = rx.recv().await {
        writer.write_all(line.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }

    reader_task.await.map_err(io::Error::other)??;
    debug!("stdio transport finished");
    Ok(())
}

async fn read_loop<R>(
    server: Arc<McpServer>,
    reader: R,
    tx: mpsc::UnboundedSender<String>,
) -> io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }

        let server = Arc::clone(&server);
        let tx = tx.clone();
        tokio::spawn(async move {
            let Some(response) = server.handle_message(&line).await else {
                return;
            };
            match serde_json::to_string(&response) {
                Ok(encoded) => {
                    // Receiver only closes when the writer failed
                    let _ = tx.send(encoded);
                }
                Err(e) => error!(error = %e, "Failed to encode JSON-RPC response"),
            }
        });
    }

    Ok(())
}
