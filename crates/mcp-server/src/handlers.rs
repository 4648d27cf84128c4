//! JSON-RPC request handlers
//!
//! [`dispatch`] routes one decoded request to its MCP method and is shared by
//! the HTTP and STDIO transports.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    prompts,
    protocol::{
        InitializeParams, InitializeResult, JsonRpcError, JsonRpcRequest, JsonRpcResponse,
        PromptListResult, PromptParams, PromptsCapability, RequestId, ResourceListResult,
        ResourceParams, ResourcesCapability, ServerCapabilities, ServerInfo, ToolCallResult,
        ToolListResult, ToolParams, ToolsCapability, JSONRPC_VERSION, MCP_VERSION,
    },
    resources::ResourceManager,
    tools, McpServerState,
};

/// Handle a JSON-RPC message posted over HTTP
#[instrument(skip(state, body))]
pub async fn handle_jsonrpc(State(state): State<Arc<McpServerState>>, body: Bytes) -> Response {
    let request: JsonRpcRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "Failed to parse JSON-RPC request");
            let response =
                JsonRpcResponse::error(None, JsonRpcError::parse_error(format!("Parse error: {}", e)));
            return Json(response).into_response();
        }
    };

    match dispatch(&state, request).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// Route a request to its method handler
///
/// Returns `None` for notifications, which never get a response.
pub async fn dispatch(state: &McpServerState, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
    debug!(method = %request.method, id = ?request.id, "Processing JSON-RPC request");

    if request.is_notification() {
        debug!(method = %request.method, "Received notification");
        return None;
    }

    let id = request.id;
    if request.jsonrpc != JSONRPC_VERSION {
        return Some(JsonRpcResponse::error(
            id,
            JsonRpcError::invalid_request(format!(
                "Unsupported jsonrpc version: {}",
                request.jsonrpc
            )),
        ));
    }

    let response = match request.method.as_str() {
        "initialize" => handle_initialize(id, request.params),
        "ping" => JsonRpcResponse::success(id, json!({})),
        "tools/list" => handle_tools_list(id),
        "tools/call" => handle_tools_call(state, id, request.params).await,
        "resources/list" => handle_resources_list(id),
        "resources/read" => handle_resources_read(id, request.params),
        "prompts/list" => handle_prompts_list(id),
        "prompts/get" => handle_prompts_get(id, request.params),
        _ => {
            warn!(method = %request.method, "Unknown method");
            JsonRpcResponse::error(id, JsonRpcError::method_not_found(request.method))
        }
    };

    Some(response)
}

fn parse_params<T: DeserializeOwned>(params: Option<Value>) -> Result<T, JsonRpcError> {
    let params = params.ok_or_else(|| JsonRpcError::invalid_params("Missing parameters"))?;
    serde_json::from_value(params).map_err(|e| {
        error!(error = %e, "Invalid params");
        JsonRpcError::invalid_params(format!("Invalid parameters: {}", e))
    })
}

fn handle_initialize(id: Option<RequestId>, params: Option<Value>) -> JsonRpcResponse {
    // Clients may omit params entirely
    let params: InitializeParams = match params {
        Some(p) => match serde_json::from_value(p) {
            Ok(params) => params,
            Err(e) => {
                return JsonRpcResponse::error(
                    id,
                    JsonRpcError::invalid_params(format!("Invalid parameters: {}", e)),
                );
            }
        },
        None => InitializeParams {
            protocol_version: None,
            capabilities: Value::Null,
            client_info: None,
        },
    };

    info!(
        client = ?params.client_info.as_ref().map(|c| c.name.as_str()),
        protocol_version = ?params.protocol_version,
        "Initializing MCP session"
    );

    let result = InitializeResult {
        protocol_version: MCP_VERSION.to_string(),
        capabilities: ServerCapabilities {
            tools: ToolsCapability {
                list_changed: false,
            },
            resources: ResourcesCapability {
                subscribe: false,
                list_changed: false,
            },
            prompts: PromptsCapability {
                list_changed: false,
            },
        },
        server_info: ServerInfo {
            name: "cinevibe".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
    };

    JsonRpcResponse::success(id, json!(result))
}

fn handle_tools_list(id: Option<RequestId>) -> JsonRpcResponse {
    debug!("Listing tools");
    JsonRpcResponse::success(
        id,
        json!(ToolListResult {
            tools: tools::definitions()
        }),
    )
}

async fn handle_tools_call(
    state: &McpServerState,
    id: Option<RequestId>,
    params: Option<Value>,
) -> JsonRpcResponse {
    let tool_params: ToolParams = match parse_params(params) {
        Ok(params) => params,
        Err(e) => return JsonRpcResponse::error(id, e),
    };

    info!(tool = %tool_params.name, "Calling tool");

    let Some(executor) = tools::executor(&tool_params.name, Arc::clone(&state.service)) else {
        return JsonRpcResponse::error(
            id,
            JsonRpcError::method_not_found(format!("Unknown tool: {}", tool_params.name)),
        );
    };

    let arguments = tool_params.arguments.unwrap_or_default();

    match executor.execute(arguments).await {
        Ok(result) => JsonRpcResponse::success(id, json!(result)),
        Err(e) if e.is_client_error() => {
            warn!(error = %e, tool = %tool_params.name, "Rejected tool arguments");
            JsonRpcResponse::error(id, JsonRpcError::invalid_params(e.to_string()))
        }
        Err(e) => {
            error!(error = %e, tool = %tool_params.name, "Tool execution failed");
            let body = json!({ "error": e.to_string(), "code": e.code() });
            JsonRpcResponse::success(id, json!(ToolCallResult::error_text(body.to_string())))
        }
    }
}

fn handle_resources_list(id: Option<RequestId>) -> JsonRpcResponse {
    debug!("Listing resources");
    JsonRpcResponse::success(
        id,
        json!(ResourceListResult {
            resources: ResourceManager::list_resources()
        }),
    )
}

fn handle_resources_read(id: Option<RequestId>, params: Option<Value>) -> JsonRpcResponse {
    let resource_params: ResourceParams = match parse_params(params) {
        Ok(params) => params,
        Err(e) => return JsonRpcResponse::error(id, e),
    };

    info!(uri = %resource_params.uri, "Reading resource");

    match ResourceManager::read_resource(&resource_params.uri) {
        Ok(result) => JsonRpcResponse::success(id, json!(result)),
        Err(e) => {
            warn!(error = ?e, uri = %resource_params.uri, "Resource read failed");
            JsonRpcResponse::error(id, e)
        }
    }
}

fn handle_prompts_list(id: Option<RequestId>) -> JsonRpcResponse {
    debug!("Listing prompts");
    JsonRpcResponse::success(
        id,
        json!(PromptListResult {
            prompts: prompts::list_prompts()
        }),
    )
}

fn handle_prompts_get(id: Option<RequestId>, params: Option<Value>) -> JsonRpcResponse {
    let prompt_params: PromptParams = match parse_params(params) {
        Ok(params) => params,
        Err(e) => return JsonRpcResponse::error(id, e),
    };

    info!(prompt = %prompt_params.name, "Getting prompt");

    let arguments = prompt_params.arguments.unwrap_or_default();
    match prompts::get_prompt(&prompt_params.name, &arguments) {
        Ok(result) => JsonRpcResponse::success(id, json!(result)),
        Err(e) => JsonRpcResponse::error(id, e),
    }
}

/// Health check handler
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({ "status": "healthy", "service": "cinevibe-mcp" })),
    )
}
