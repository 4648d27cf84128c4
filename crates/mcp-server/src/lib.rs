//! # CineVibe MCP Server
//!
//! Model Context Protocol (MCP) server exposing vibe-based movie and TV
//! discovery to AI assistants.
//!
//! ## Protocol Support
//!
//! - JSON-RPC 2.0
//! - MCP protocol version 2024-11-05
//! - Tools, resources (rule and genre tables) and prompts
//!
//! ## Transport Modes
//!
//! ### HTTP Transport (Default)
//! `POST /` accepts one JSON-RPC message, `GET /health` reports liveness.
//!
//! ### STDIO Transport
//! Line-delimited JSON-RPC over standard input/output, selected with
//! `--stdio`. Logs always go to stderr.

use axum::{
    routing::{get, post},
    Router,
};
use cinevibe_core::{config::ProviderConfig, Result};
use cinevibe_discovery::VibeService;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod handlers;
pub mod prompts;
pub mod protocol;
pub mod resources;
pub mod tools;
pub mod transport;

/// MCP Server state shared across handlers and transports
pub struct McpServerState {
    pub service: Arc<VibeService>,
}

impl McpServerState {
    pub fn new(service: VibeService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Build the provider clients and discovery service from configuration
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        Ok(Self::new(VibeService::from_config(config)?))
    }
}

/// HTTP routes: JSON-RPC on `POST /`, liveness on `GET /health`
pub fn router(state: Arc<McpServerState>) -> Router {
    Router::new()
        .route("/", post(handlers::handle_jsonrpc))
        .route("/health", get(handlers::health_check))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider_config() -> ProviderConfig {
        ProviderConfig::with_credentials("tmdb-key", "omdb-key", "trakt-id")
    }

    #[test]
    fn test_state_from_config() {
        let state = McpServerState::from_config(&provider_config());
        assert!(state.is_ok());
    }

    #[test]
    fn test_state_shares_service() {
        let state = McpServerState::from_config(&provider_config()).unwrap();
        let service = Arc::clone(&state.service);
        assert_eq!(Arc::strong_count(&service), 2);
    }
}
