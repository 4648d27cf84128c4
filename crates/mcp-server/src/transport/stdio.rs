//! STDIO transport for the MCP server
//!
//! One JSON-RPC message per line on stdin, one response per line on stdout.
//! Blank lines are skipped and notifications produce no output.

use crate::handlers::dispatch;
use crate::protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
use crate::McpServerState;
use anyhow::Result;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

/// Run the MCP server over the process's stdin and stdout
pub async fn run_stdio_server(state: Arc<McpServerState>) -> Result<()> {
    info!("Starting MCP server with STDIO transport");
    serve(state, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await?;
    info!("STDIO transport shutting down");
    Ok(())
}

/// Serve line-delimited JSON-RPC from `reader` until end of input
pub async fn serve<R, W>(state: Arc<McpServerState>, reader: R, mut writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        debug!(request = %line, "Received STDIO request");

        let response = match serde_json::from_str::<JsonRpcRequest>(&line) {
            Ok(request) => dispatch(&state, request).await,
            Err(e) => {
                warn!(error = %e, "Parse error");
                Some(JsonRpcResponse::error(
                    None,
                    JsonRpcError::parse_error(format!("Parse error: {}", e)),
                ))
            }
        };

        if let Some(response) = response {
            write_response(&mut writer, &response).await?;
        }
    }

    Ok(())
}

async fn write_response<W: AsyncWrite + Unpin>(
    writer: &mut W,
    response: &JsonRpcResponse,
) -> Result<()> {
    let output = match serde_json::to_string(response) {
        Ok(output) => output,
        Err(e) => serde_json::to_string(&JsonRpcResponse::error(
            response.id.clone(),
            JsonRpcError::internal_error(format!("Serialization error: {}", e)),
        ))?,
    };

    writer.write_all(output.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    debug!(response = %output, "Sent STDIO response");
    Ok(())
}
