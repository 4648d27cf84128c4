//! Integration tests for the MCP HTTP surface
//!
//! Requests go through the real router; provider APIs are served by wiremock.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use cinevibe_core::ProviderConfig;
use cinevibe_discovery::VibeService;
use cinevibe_mcp::{router, McpServerState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Test app whose providers all point at `server`
fn create_test_app(server: &MockServer) -> Router {
    let mut config = ProviderConfig::with_credentials("tmdb-key", "omdb-key", "trakt-id");
    config.tmdb_base_url = server.uri();
    config.omdb_base_url = server.uri();
    config.trakt_base_url = server.uri();

    let service = VibeService::from_config(&config)
        .unwrap()
        .with_current_year(2024);
    router(Arc::new(McpServerState::new(service)))
}

async fn post_raw(app: Router, body: String) -> (StatusCode, Option<Value>) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).ok();

    (status, json)
}

/// Send a JSON-RPC request with id 1
async fn send_jsonrpc_request(app: Router, method: &str, params: Option<Value>) -> Value {
    let request_body = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": method,
        "params": params
    });

    let (status, json) = post_raw(app, request_body.to_string()).await;
    assert_eq!(status, StatusCode::OK);
    json.unwrap()
}

async fn call_tool(app: Router, name: &str, arguments: Value) -> Value {
    send_jsonrpc_request(
        app,
        "tools/call",
        Some(json!({ "name": name, "arguments": arguments })),
    )
    .await
}

/// Parse the JSON text carried by a tool result
fn tool_payload(response: &Value) -> Value {
    let text = response["result"]["content"][0]["text"].as_str().unwrap();
    serde_json::from_str(text).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let server = MockServer::start().await;
    let app = create_test_app(&server);

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn test_initialize() {
    let server = MockServer::start().await;
    let response = send_jsonrpc_request(
        create_test_app(&server),
        "initialize",
        Some(json!({
            "protocolVersion": "2024-11-05",
            "capabilities": {},
            "clientInfo": { "name": "test-client", "version": "1.0.0" }
        })),
    )
    .await;

    assert_eq!(response["id"], 1);
    assert_eq!(response["result"]["protocolVersion"], "2024-11-05");
    assert_eq!(response["result"]["serverInfo"]["name"], "cinevibe");
    assert!(response["result"]["capabilities"]["tools"].is_object());
}

#[tokio::test]
async fn test_tools_list() {
    let server = MockServer::start().await;
    let response = send_jsonrpc_request(create_test_app(&server), "tools/list", None).await;

    let tools = response["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 14);

    let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
    for expected in [
        "search_titles",
        "get_enriched_details",
        "find_rating_mismatches",
        "find_by_vibe_modifier",
        "find_by_mood",
        "find_by_personality",
        "analyze_title_vibe",
        "get_community_trending",
        "find_movies_by_trakt_vibe",
        "get_trakt_genre_recommendations",
    ] {
        assert!(names.contains(&expected), "missing tool {}", expected);
    }
    assert!(tools[0]["inputSchema"].is_object());
}

#[tokio::test]
async fn test_unknown_method_and_tool() {
    let server = MockServer::start().await;

    let response = send_jsonrpc_request(create_test_app(&server), "tools/explode", None).await;
    assert_eq!(response["error"]["code"], -32601);

    let response = call_tool(create_test_app(&server), "semantic_search", json!({})).await;
    assert_eq!(response["error"]["code"], -32601);
    assert!(response["error"]["message"]
        .as_str()
        .unwrap()
        .contains("semantic_search"));
}

#[tokio::test]
async fn test_notification_gets_no_body() {
    let server = MockServer::start().await;
    let (status, body) = post_raw(
        create_test_app(&server),
        json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }).to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::ACCEPTED);
    assert!(body.is_none());
}

#[tokio::test]
async fn test_malformed_json_is_parse_error() {
    let server = MockServer::start().await;
    let (status, body) = post_raw(create_test_app(&server), "{not json".to_string()).await;

    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(body["error"]["code"], -32700);
    assert!(body["id"].is_null());
}

#[tokio::test]
async fn test_search_titles_tool() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/movie"))
        .and(query_param("query", "arrival"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "total_pages": 1,
            "results": [{
                "id": 329865,
                "title": "Arrival",
                "release_date": "2016-11-10",
                "genre_ids": [18, 878],
                "vote_average": 7.6,
                "vote_count": 18000
            }]
        })))
        .mount(&server)
        .await;

    let response = call_tool(create_test_app(&server), "search_titles", json!({ "query": "arrival" })).await;

    assert_eq!(response["result"]["isError"], false);
    let payload = tool_payload(&response);
    assert_eq!(payload["results_count"], 1);
    assert_eq!(payload["results"][0]["id"], 329865);
    assert_eq!(payload["results"][0]["year"], 2016);
}

#[tokio::test]
async fn test_validation_failure_is_invalid_params() {
    let server = MockServer::start().await;

    let response = call_tool(
        create_test_app(&server),
        "find_rating_mismatches",
        json!({ "query": "heat", "min_gap": 9.0 }),
    )
    .await;
    assert_eq!(response["error"]["code"], -32602);

    let response = call_tool(
        create_test_app(&server),
        "find_by_vibe_modifier",
        json!({ "reference_title": "Heat", "modifier": "grounded", "limit": 50 }),
    )
    .await;
    assert_eq!(response["error"]["code"], -32602);

    let response = call_tool(create_test_app(&server), "get_enriched_details", json!({})).await;
    assert_eq!(response["error"]["code"], -32602);
}

#[tokio::test]
async fn test_not_found_is_error_result() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movie/999999"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "status_code": 34,
            "status_message": "The resource you requested could not be found."
        })))
        .mount(&server)
        .await;

    let response = call_tool(
        create_test_app(&server),
        "get_enriched_details",
        json!({ "title_id": 999999 }),
    )
    .await;

    assert!(response.get("error").is_none());
    assert_eq!(response["result"]["isError"], true);
    assert_eq!(tool_payload(&response)["code"], "not_found");
}

#[tokio::test]
async fn test_upstream_failure_is_error_result() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/movie"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let response = call_tool(create_test_app(&server), "search_titles", json!({ "query": "heat" })).await;

    assert_eq!(response["result"]["isError"], true);
    assert_eq!(tool_payload(&response)["code"], "upstream_unavailable");
}

#[tokio::test]
async fn test_trakt_genre_recommendations_tool() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movies/popular"))
        .and(query_param("genres", "comedy"))
        .and(query_param("certifications", "g,pg,pg-13"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "title": "Paddington 2", "year": 2017, "ids": { "tmdb": 346648, "imdb": "tt4468740" } }
        ])))
        .mount(&server)
        .await;

    let response = call_tool(
        create_test_app(&server),
        "get_trakt_genre_recommendations",
        json!({ "genre": "Comedy", "vibe_filter": "cozy" }),
    )
    .await;

    assert_eq!(response["result"]["isError"], false);
    let payload = tool_payload(&response);
    assert_eq!(payload["vibe_filter"], "cozy");
    assert_eq!(payload["results"][0]["title"], "Paddington 2");
    assert_eq!(payload["results"][0]["tmdb_id"], 346648);
    assert!(payload["results"][0].get("source_list").is_none());

    let response = call_tool(
        create_test_app(&server),
        "get_trakt_genre_recommendations",
        json!({ "genre": "Comedy", "vibe_filter": "grounded" }),
    )
    .await;
    assert_eq!(response["error"]["code"], -32602);
}

#[tokio::test]
async fn test_resources() {
    let server = MockServer::start().await;

    let response = send_jsonrpc_request(create_test_app(&server), "resources/list", None).await;
    let resources = response["result"]["resources"].as_array().unwrap();
    assert_eq!(resources.len(), 6);
    assert_eq!(resources[0]["mimeType"], "application/json");

    let response = send_jsonrpc_request(
        create_test_app(&server),
        "resources/read",
        Some(json!({ "uri": "cinevibe://rules/personalities" })),
    )
    .await;
    let text = response["result"]["contents"][0]["text"].as_str().unwrap();
    let table: Value = serde_json::from_str(text).unwrap();
    assert_eq!(table["kind"], "personality");
    assert_eq!(table["entries"].as_array().unwrap().len(), 5);

    let response = send_jsonrpc_request(
        create_test_app(&server),
        "resources/read",
        Some(json!({ "uri": "cinevibe://nowhere" })),
    )
    .await;
    assert_eq!(response["error"]["code"], -32002);
}

#[tokio::test]
async fn test_prompts() {
    let server = MockServer::start().await;

    let response = send_jsonrpc_request(create_test_app(&server), "prompts/list", None).await;
    assert_eq!(response["result"]["prompts"].as_array().unwrap().len(), 3);

    let response = send_jsonrpc_request(
        create_test_app(&server),
        "prompts/get",
        Some(json!({ "name": "movie_night", "arguments": { "mood": "energetic" } })),
    )
    .await;
    assert_eq!(response["result"]["messages"][0]["role"], "user");
    assert_eq!(response["result"]["messages"][0]["content"]["type"], "text");

    let response = send_jsonrpc_request(
        create_test_app(&server),
        "prompts/get",
        Some(json!({ "name": "movie_night" })),
    )
    .await;
    assert_eq!(response["error"]["code"], -32602);
}
