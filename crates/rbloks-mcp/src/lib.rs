// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//!
//! `rbloks-mcp`: MCP (Model Context Protocol) server for RationalBloks.
//!
//! Exposes the backend gateway tools and the frontend generators to any
//! MCP-compatible host, together with prompt templates and markdown
//! reference documents.
//!
//! # Transports
//!
//! ```text
//! rationalbloks-mcp                        # stdio, key from RATIONALBLOKS_API_KEY
//! rationalbloks-mcp --transport http       # streamable HTTP on 0.0.0.0:8000
//! ```
//!
//! # MCP client configuration (`mcp.json`)
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "rationalbloks": {
//!       "command": "rationalbloks-mcp",
//!       "env": { "RATIONALBLOKS_API_KEY": "rb_sk_..." }
//!     }
//!   }
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! MCP client (Cursor, Claude Desktop, ...)
//!       │  stdin/stdout  or  POST /mcp (Bearer rb_sk_...)
//!       ▼
//! RationalBloksServer (rmcp ServerHandler)
//!       │
//!       ▼
//! ToolRegistry ──► backend tools ──► LogicBlok gateway
//!              └─► frontend tools ──► project files on disk
//! ```

pub mod bridge;
pub mod prompts;
pub mod resources;
pub mod server;
pub mod transport;

pub use server::{instructions, ApiKeySource, RationalBloksServer};
pub use transport::{router, serve_http, server_card, HttpOptions};

use anyhow::Result;
use rmcp::ServiceExt;

/// Serve on `stdin` / `stdout` until the client disconnects.
///
/// # Errors
///
/// Returns an error if the rmcp transport fails to initialize or if the
/// server encounters a fatal I/O error.
pub async fn serve_stdio(server: RationalBloksServer) -> Result<()> {
    let running = server
        .serve((tokio::io::stdin(), tokio::io::stdout()))
        .await
        .map_err(|e| anyhow::anyhow!("MCP server init error: {e}"))?;
    running
        .waiting()
        .await
        .map_err(|e| anyhow::anyhow!("MCP server error: {e}"))?;
    Ok(())
}
