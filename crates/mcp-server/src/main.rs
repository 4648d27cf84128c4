//! MCP Server binary
//!
//! Supports two transport modes:
//! - HTTP (default): JSON-RPC on `POST /`, liveness on `GET /health`
//! - STDIO: line-delimited JSON-RPC for desktop assistants (use the --stdio flag)

use cinevibe_core::{
    init_logging, load_dotenv, ConfigLoader, LogConfig, ProviderConfig, ServerConfig,
};
use cinevibe_mcp::{router, transport, McpServerState};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let use_stdio = std::env::args().any(|arg| arg == "--stdio");

    load_dotenv();

    let server_config = ServerConfig::from_env()?;
    server_config.validate()?;

    init_logging(&LogConfig {
        format: server_config.log_format,
        level: server_config.log_level.clone(),
        service_name: "cinevibe-mcp".to_string(),
    })?;

    info!("Starting CineVibe MCP Server");

    // Missing credentials are fatal
    let provider_config = ProviderConfig::from_env()
        .and_then(|config| config.validate().map(|_| config))
        .map_err(|e| {
            error!(error = %e, "Invalid provider configuration");
            anyhow::anyhow!("Provider configuration failed: {}", e)
        })?;

    let state = Arc::new(McpServerState::from_config(&provider_config)?);

    if use_stdio {
        info!("Server ready on STDIO");

        transport::run_stdio_server(state).await.map_err(|e| {
            error!(error = %e, "STDIO transport error");
            anyhow::anyhow!("STDIO server failed: {}", e)
        })?;
    } else {
        let app = router(state);

        let addr = server_config.address();
        let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
            error!(error = %e, address = %addr, "Failed to bind to address");
            anyhow::anyhow!("Failed to bind: {}", e)
        })?;

        info!(address = %addr, "MCP server listening");
        info!("Health check endpoint: http://{}/health", addr);

        axum::serve(listener, app).await.map_err(|e| {
            error!(error = %e, "Server error");
            anyhow::anyhow!("Server failed: {}", e)
        })?;
    }

    Ok(())
}
