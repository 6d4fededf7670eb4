// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Streamable-HTTP transport: the MCP service plus discovery and health
//! endpoints behind one axum router.

use std::time::Duration;

use anyhow::{Context, Result};
use axum::{routing::get, Json, Router};
use http::{header::HeaderName, Method};
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager, StreamableHttpServerConfig, StreamableHttpService,
};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::server::{RationalBloksServer, SERVER_NAME, SERVER_TITLE, VERSION, WEBSITE_URL};

pub const SERVER_CARD_PATH: &str = "/.well-known/mcp/server-card.json";
const DESCRIPTION: &str =
    "Build production REST APIs and React frontends from JSON schemas with RationalBloks";

/// Bind address of the HTTP transport.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    pub host: String,
    pub port: u16,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8000,
        }
    }
}

/// Discovery document for MCP registries.
pub fn server_card() -> Value {
    json!({
        "name": SERVER_NAME,
        "displayName": SERVER_TITLE,
        "version": VERSION,
        "description": DESCRIPTION,
        "vendor": "RationalBloks",
        "homepage": WEBSITE_URL,
        "icon": format!("{WEBSITE_URL}/logo.svg"),
        "documentation": format!("{WEBSITE_URL}/docs/mcp"),
        "capabilities": {
            "tools": true,
            "resources": true,
            "prompts": true
        },
        "authentication": {
            "type": "bearer",
            "scheme": "Bearer",
            "description": "RationalBloks API Key (format: rb_sk_...)",
            "header": "Authorization: Bearer rb_sk_..."
        },
        "configSchema": {
            "type": "object",
            "title": "RationalBloks Configuration",
            "required": [],
            "properties": {
                "apiKey": {
                    "type": "string",
                    "title": "API Key",
                    "description": "Your RationalBloks API key (get from https://rationalbloks.com/settings)",
                    "default": "",
                    "x-from": { "header": "authorization" }
                },
                "mode": {
                    "type": "string",
                    "title": "Mode",
                    "description": "MCP mode: backend, frontend, or full (default: full)",
                    "default": "full",
                    "enum": ["backend", "frontend", "full"]
                }
            }
        }
    })
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": VERSION }))
}

async fn card() -> Json<Value> {
    Json(server_card())
}

/// Router serving MCP on `/mcp`, `/sse` and every other unmatched path.
pub fn router(server: RationalBloksServer) -> Router {
    let mcp = StreamableHttpService::new(
        move || Ok(server.clone()),
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig {
            stateful_mode: false,
            sse_keep_alive: Some(Duration::from_secs(15)),
            ..Default::default()
        },
    );

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any)
        .expose_headers([HeaderName::from_static("mcp-session-id")]);

    Router::new()
        .route(SERVER_CARD_PATH, get(card))
        .route("/health", get(health))
        .nest_service("/mcp", mcp.clone())
        .nest_service("/sse", mcp.clone())
        .fallback_service(mcp)
        .layer(cors)
}

/// Serve until Ctrl-C.
pub async fn serve_http(server: RationalBloksServer, opts: HttpOptions) -> Result<()> {
    let mode = server.mode();
    let app = router(server);
    let listener = tokio::net::TcpListener::bind((opts.host.as_str(), opts.port))
        .await
        .with_context(|| format!("failed to bind {}:{}", opts.host, opts.port))?;
    let addr = listener.local_addr()?;

    info!(%addr, %mode, "HTTP server listening");
    info!("MCP endpoints: http://{addr}/mcp (primary), http://{addr}/sse");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await
        .context("HTTP server error")
}
