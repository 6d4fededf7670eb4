// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::fmt::Display;

use async_trait::async_trait;
use rbloks_config::ServerMode;
use serde::Serialize;
use serde_json::Value;

/// A single tool invocation received from the MCP client.
#[derive(Clone)]
pub struct ToolCall {
    /// Request-scoped identifier, forwarded verbatim into the output.
    pub id: String,
    pub name: String,
    /// Parsed JSON arguments (always an object when coming from MCP).
    pub args: Value,
    /// Key the call is made on behalf of; `None` when the caller sent none.
    pub api_key: Option<String>,
}

impl std::fmt::Debug for ToolCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolCall")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("args", &self.args)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// The result of executing a tool: a single text item, flagged when the
/// call failed.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput {
    pub call_id: String,
    pub content: String,
    pub is_error: bool,
}

impl ToolOutput {
    pub fn ok(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            content: content.into(),
            is_error: false,
        }
    }

    pub fn err(call_id: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            content: msg.into(),
            is_error: true,
        }
    }

    /// Pretty-printed JSON (2-space indent).
    pub fn json(call_id: impl Into<String>, value: &impl Serialize) -> Self {
        match serde_json::to_string_pretty(value) {
            Ok(text) => Self::ok(call_id, text),
            Err(e) => Self::err(call_id, format!("Error: failed to encode result: {e}")),
        }
    }

    /// `Error: <message>`
    pub fn error(call_id: impl Into<String>, e: &dyn Display) -> Self {
        Self::err(call_id, format!("Error: {e}"))
    }
}

/// MCP tool annotations.  `idempotent` is optional because not every tool
/// makes a claim either way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToolHints {
    pub read_only: bool,
    pub destructive: bool,
    pub idempotent: Option<bool>,
    pub open_world: bool,
}

impl ToolHints {
    /// Local or remote read without side effects.
    pub const READ: ToolHints = ToolHints {
        read_only: true,
        destructive: false,
        idempotent: None,
        open_world: false,
    };

    /// Rewrites files in a local project; running twice gives the same tree.
    pub const LOCAL_WRITE: ToolHints = ToolHints {
        read_only: false,
        destructive: false,
        idempotent: Some(true),
        open_world: false,
    };
}

/// Trait every RationalBloks tool implements.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    /// Human-readable display name.
    fn title(&self) -> &str;
    fn description(&self) -> &str;
    /// JSON Schema for parameters
    fn parameters_schema(&self) -> Value;
    fn hints(&self) -> ToolHints;
    /// The server modes in which this tool is listed.
    fn modes(&self) -> &[ServerMode];
    /// Execute the tool.  Errors are reported through [`ToolOutput::err`].
    async fn execute(&self, call: &ToolCall) -> ToolOutput;
}

/// Modes that expose gateway tools.
pub const BACKEND_MODES: &[ServerMode] = &[ServerMode::Backend, ServerMode::Full];

/// Modes that expose frontend generators.
pub const FRONTEND_MODES: &[ServerMode] = &[ServerMode::Frontend, ServerMode::Full];
