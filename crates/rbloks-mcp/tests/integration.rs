// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//!
//! End-to-end tests for the RationalBloks MCP server.
//!
//! The stdio-style tests drive a real [`RationalBloksServer`] over in-memory
//! pipes with raw JSON-RPC 2.0 messages, so they check the wire format a
//! real MCP host sees.  The HTTP tests call the axum router directly.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use http_body_util::BodyExt;
use rbloks_client::{ClientPool, GatewaySettings};
use rbloks_config::{FrontendConfig, ServerMode};
use rbloks_mcp::{router, ApiKeySource, RationalBloksServer};
use rbloks_tools::{build_registry, ToolContext};
use rmcp::ServiceExt;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream, ReadHalf, WriteHalf};
use tower::ServiceExt as _;

const KEY: &str = "rb_sk_0123456789abcdefghij";

// ── In-process MCP server harness ────────────────────────────────────────────

type Reader = BufReader<ReadHalf<DuplexStream>>;
type Writer = WriteHalf<DuplexStream>;

fn make_server(mode: ServerMode, keys: ApiKeySource) -> RationalBloksServer {
    let registry = build_registry(mode, &ToolContext::default(), None);
    RationalBloksServer::new(Arc::new(registry), mode, keys)
}

async fn start_test_server(server: RationalBloksServer) -> (Writer, Reader) {
    let (client_stream, server_stream) = tokio::io::duplex(65536);

    tokio::spawn(async move {
        if let Ok(running) = server.serve(server_stream).await {
            let _ = running.waiting().await;
        }
    });

    let (client_read, client_write) = tokio::io::split(client_stream);
    (client_write, BufReader::new(client_read))
}

async fn send_msg(writer: &mut Writer, msg: &Value) {
    let line = serde_json::to_string(msg).expect("message must serialize");
    writer.write_all(line.as_bytes()).await.expect("write failed");
    writer.write_all(b"\n").await.expect("newline write failed");
    writer.flush().await.expect("flush failed");
}

/// Read one JSON-RPC line.  Times out after 5 s.
async fn recv_msg(reader: &mut Reader) -> Value {
    let mut line = String::new();
    tokio::time::timeout(std::time::Duration::from_secs(5), reader.read_line(&mut line))
        .await
        .expect("timed out waiting for server response")
        .expect("read error");
    serde_json::from_str(line.trim()).expect("server response must be valid JSON")
}

async fn initialize(writer: &mut Writer, reader: &mut Reader) -> Value {
    send_msg(
        writer,
        &json!({
            "jsonrpc": "2.0",
            "id": 0,
            "method": "initialize",
            "params": {
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": { "name": "rbloks-test-client", "version": "0.0.0" }
            }
        }),
    )
    .await;

    let init_resp = recv_msg(reader).await;
    assert!(
        init_resp["result"].is_object(),
        "initialize must return a result object"
    );

    send_msg(
        writer,
        &json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }),
    )
    .await;

    init_resp["result"].clone()
}

/// Start a server, complete the handshake, then send one request.
async fn request(server: RationalBloksServer, method: &str, params: Value) -> Value {
    let (mut writer, mut reader) = start_test_server(server).await;
    initialize(&mut writer, &mut reader).await;
    send_msg(
        &mut writer,
        &json!({ "jsonrpc": "2.0", "id": 1, "method": method, "params": params }),
    )
    .await;
    recv_msg(&mut reader).await
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn initialize_advertises_server_and_capabilities() {
    let (mut writer, mut reader) =
        start_test_server(make_server(ServerMode::Full, ApiKeySource::Fixed(KEY.into()))).await;
    let result = initialize(&mut writer, &mut reader).await;

    assert!(result["capabilities"]["tools"].is_object(), "got: {result}");
    assert!(result["capabilities"]["prompts"].is_object());
    assert!(result["capabilities"]["resources"].is_object());
    assert_eq!(result["serverInfo"]["name"], "rationalbloks");
    assert_eq!(result["serverInfo"]["title"], "RationalBloks MCP");
    assert_eq!(result["serverInfo"]["websiteUrl"], "https://rationalbloks.com");
    let instructions = result["instructions"].as_str().unwrap();
    assert!(instructions.contains("Backend Mode") && instructions.contains("Frontend Mode"));
}

// ── Tools ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn tools_list_follows_mode() {
    let resp = request(
        make_server(ServerMode::Backend, ApiKeySource::Fixed(KEY.into())),
        "tools/list",
        json!({}),
    )
    .await;
    let tools = resp["result"]["tools"].as_array().expect("tools must be an array");
    assert_eq!(tools.len(), 18);
    assert!(tools.iter().all(|t| t["inputSchema"]["type"] == "object"));

    let resp = request(
        make_server(ServerMode::Frontend, ApiKeySource::PerRequest),
        "tools/list",
        json!({}),
    )
    .await;
    assert_eq!(resp["result"]["tools"].as_array().unwrap().len(), 14);
}

#[tokio::test]
async fn tools_list_carries_titles_and_annotations() {
    let resp = request(
        make_server(ServerMode::Backend, ApiKeySource::Fixed(KEY.into())),
        "tools/list",
        json!({}),
    )
    .await;
    let tools = resp["result"]["tools"].as_array().unwrap();
    let delete = tools.iter().find(|t| t["name"] == "delete_project").unwrap();
    assert_eq!(delete["title"], "Delete Project");
    assert_eq!(delete["annotations"]["destructiveHint"], true);
    assert_eq!(delete["annotations"]["readOnlyHint"], false);

    let list = tools.iter().find(|t| t["name"] == "list_projects").unwrap();
    assert_eq!(list["annotations"]["readOnlyHint"], true);
}

#[tokio::test]
async fn frontend_tool_runs_against_project_directory() {
    let dir = tempfile::tempdir().unwrap();
    let resp = request(
        make_server(ServerMode::Full, ApiKeySource::PerRequest),
        "tools/call",
        json!({
            "name": "generate_types",
            "arguments": {
                "project_path": dir.path(),
                "schema": { "tasks": { "title": { "type": "string" } } }
            }
        }),
    )
    .await;

    let result = &resp["result"];
    assert_eq!(result["isError"], false, "got: {resp}");
    let body: Value = serde_json::from_str(result["content"][0]["text"].as_str().unwrap()).unwrap();
    assert_eq!(body["success"], true);
    assert!(dir.path().join("src/types/generated.ts").is_file());
}

#[tokio::test]
async fn backend_tool_without_bearer_reports_missing_key() {
    // over pipes there are no HTTP request parts, so no key is found
    let resp = request(
        make_server(ServerMode::Backend, ApiKeySource::PerRequest),
        "tools/call",
        json!({ "name": "list_projects", "arguments": {} }),
    )
    .await;
    assert_eq!(resp["result"]["isError"], true);
    assert_eq!(
        resp["result"]["content"][0]["text"],
        "Error: API key is required"
    );
}

#[tokio::test]
async fn unknown_tool_is_an_error_result() {
    let resp = request(
        make_server(ServerMode::Backend, ApiKeySource::Fixed(KEY.into())),
        "tools/call",
        json!({ "name": "scaffold_frontend", "arguments": {} }),
    )
    .await;
    assert_eq!(resp["result"]["isError"], true);
    assert_eq!(
        resp["result"]["content"][0]["text"],
        "unknown tool: scaffold_frontend"
    );
}

// ── Prompts ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn prompts_list_follows_mode() {
    let resp = request(
        make_server(ServerMode::Frontend, ApiKeySource::PerRequest),
        "prompts/list",
        json!({}),
    )
    .await;
    let names: Vec<&str> = resp["result"]["prompts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["scaffold-from-schema", "create-fullstack-app"]);
}

#[tokio::test]
async fn prompt_get_renders_user_message() {
    let resp = request(
        make_server(ServerMode::Backend, ApiKeySource::Fixed(KEY.into())),
        "prompts/get",
        json!({
            "name": "create-project-from-description",
            "arguments": { "description": "a library with books and loans" }
        }),
    )
    .await;
    let message = &resp["result"]["messages"][0];
    assert_eq!(message["role"], "user");
    assert!(message["content"]["text"]
        .as_str()
        .unwrap()
        .starts_with("Create a RationalBloks project schema for: a library with books and loans"));
}

#[tokio::test]
async fn unknown_prompt_is_invalid_params() {
    let resp = request(
        make_server(ServerMode::Full, ApiKeySource::PerRequest),
        "prompts/get",
        json!({ "name": "nope" }),
    )
    .await;
    assert_eq!(resp["error"]["code"], -32602);
    assert_eq!(resp["error"]["message"], "Unknown prompt: nope");
}

// ── Resources ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn resources_are_listed_and_readable() {
    let resp = request(
        make_server(ServerMode::Backend, ApiKeySource::Fixed(KEY.into())),
        "resources/list",
        json!({}),
    )
    .await;
    let resources = resp["result"]["resources"].as_array().unwrap();
    assert_eq!(resources.len(), 3);
    assert_eq!(resources[2]["uri"], "rationalbloks://docs/api-reference");
    assert_eq!(resources[2]["mimeType"], "text/markdown");

    let resp = request(
        make_server(ServerMode::Backend, ApiKeySource::Fixed(KEY.into())),
        "resources/read",
        json!({ "uri": "rationalbloks://docs/getting-started" }),
    )
    .await;
    let text = resp["result"]["contents"][0]["text"].as_str().unwrap();
    assert!(text.starts_with("# Getting Started with RationalBloks MCP"));
}

#[tokio::test]
async fn unknown_resource_is_an_error() {
    let resp = request(
        make_server(ServerMode::Full, ApiKeySource::PerRequest),
        "resources/read",
        json!({ "uri": "rationalbloks://docs/missing" }),
    )
    .await;
    assert_eq!(
        resp["error"]["message"],
        "Unknown resource: rationalbloks://docs/missing"
    );
}

// ── HTTP router ───────────────────────────────────────────────────────────────

async fn get_json(uri: &str) -> (http::StatusCode, http::HeaderMap, Value) {
    let app = router(make_server(ServerMode::Full, ApiKeySource::PerRequest));
    let resp = app
        .oneshot(
            http::Request::builder()
                .uri(uri)
                .header("Origin", "https://agent.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, headers, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn health_reports_version() {
    let (status, _, body) = get_json("/health").await;
    assert_eq!(status, http::StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }));
}

#[tokio::test]
async fn server_card_describes_bearer_auth_and_modes() {
    let (status, _, card) = get_json("/.well-known/mcp/server-card.json").await;
    assert_eq!(status, http::StatusCode::OK);
    assert_eq!(card["name"], "rationalbloks");
    assert_eq!(card["displayName"], "RationalBloks MCP");
    assert_eq!(card["authentication"]["type"], "bearer");
    assert_eq!(
        card["configSchema"]["properties"]["apiKey"]["x-from"]["header"],
        "authorization"
    );
    assert_eq!(
        card["configSchema"]["properties"]["mode"]["enum"],
        json!(["backend", "frontend", "full"])
    );
}

/// Server whose gateway is unreachable, so a tool call that gets past key
/// resolution fails fast with a connection error.
fn offline_server() -> RationalBloksServer {
    let settings = GatewaySettings {
        base_url: "http://127.0.0.1:9".into(),
        timeout: Duration::from_secs(2),
        max_retries: 1,
        retry_base_delay: Duration::from_millis(1),
        ..GatewaySettings::default()
    };
    let ctx = ToolContext::new(Arc::new(ClientPool::new(settings)), FrontendConfig::default());
    let registry = build_registry(ServerMode::Backend, &ctx, None);
    RationalBloksServer::new(Arc::new(registry), ServerMode::Backend, ApiKeySource::PerRequest)
}

/// POST one `tools/call` over streamable HTTP and return the JSON-RPC reply.
async fn post_tool_call(path: &str, bearer: Option<&str>) -> Value {
    let msg = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "tools/call",
        "params": { "name": "list_projects", "arguments": {} }
    });
    let mut req = http::Request::builder()
        .method(http::Method::POST)
        .uri(path)
        .header("content-type", "application/json")
        .header("accept", "application/json, text/event-stream");
    if let Some(key) = bearer {
        req = req.header("authorization", format!("Bearer {key}"));
    }
    let resp = router(offline_server())
        .oneshot(req.body(Body::from(msg.to_string())).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), http::StatusCode::OK, "POST {path}");

    // The reply may arrive as a plain JSON body or as SSE `data:` lines.
    let mut body = resp.into_body();
    let mut buf = String::new();
    let read = async {
        while let Some(frame) = body.frame().await {
            if let Ok(data) = frame.unwrap().into_data() {
                buf.push_str(&String::from_utf8_lossy(&data));
            }
            if let Some(reply) = find_reply(&buf) {
                return reply;
            }
        }
        find_reply(&buf).unwrap_or_else(|| panic!("no reply in {buf:?}"))
    };
    tokio::time::timeout(Duration::from_secs(10), read)
        .await
        .expect("timed out waiting for tools/call reply")
}

fn find_reply(buf: &str) -> Option<Value> {
    if let Ok(v) = serde_json::from_str::<Value>(buf.trim()) {
        if v["id"] == 1 {
            return Some(v);
        }
    }
    buf.lines()
        .filter_map(|l| l.strip_prefix("data:"))
        .filter_map(|d| serde_json::from_str::<Value>(d.trim()).ok())
        .find(|v| v["id"] == 1)
}

#[tokio::test]
async fn http_call_without_bearer_reports_missing_key() {
    for path in ["/mcp", "/sse", "/"] {
        let resp = post_tool_call(path, None).await;
        assert_eq!(resp["result"]["isError"], true, "{path}");
        assert_eq!(
            resp["result"]["content"][0]["text"],
            "Error: API key is required",
            "{path}"
        );
    }
}

#[tokio::test]
async fn http_bearer_key_reaches_the_gateway_client() {
    for path in ["/mcp", "/sse", "/"] {
        let resp = post_tool_call(path, Some(KEY)).await;
        assert_eq!(resp["result"]["isError"], true, "{path}");
        let text = resp["result"]["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("Max retries (1) exceeded"), "{path}: {text}");
        assert!(!text.contains("API key"), "{path}: {text}");
    }
}

#[tokio::test]
async fn http_malformed_bearer_is_treated_as_missing() {
    let resp = post_tool_call("/mcp", Some("sk_not_a_rationalbloks_key")).await;
    assert_eq!(
        resp["result"]["content"][0]["text"],
        "Error: API key is required"
    );
}

#[tokio::test]
async fn cors_allows_any_origin_and_exposes_session_header() {
    let (_, headers, _) = get_json("/health").await;
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-expose-headers"], "mcp-session-id");
}
