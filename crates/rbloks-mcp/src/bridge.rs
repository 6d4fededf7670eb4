// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//!
//! Type conversions between the RationalBloks tool types and rmcp's MCP
//! model types.
//!
//! The bridge sits at the seam between [`rbloks_tools`] and the MCP wire
//! protocol so neither side needs to know about the other.

use std::borrow::Cow;
use std::sync::Arc;

use rbloks_tools::{ToolHints, ToolOutput, ToolSchema};
use rmcp::model::{CallToolResult, Content, JsonObject, Tool as McpTool, ToolAnnotations};

/// Convert a [`ToolSchema`] into an rmcp [`McpTool`] descriptor carrying the
/// display title and behaviour annotations.
pub fn schema_to_mcp_tool(schema: ToolSchema) -> McpTool {
    let annotations = hints_to_annotations(&schema.title, schema.hints);
    let mut tool = McpTool::new(
        Cow::Owned(schema.name),
        Cow::Owned(schema.description),
        Arc::new(value_to_object(schema.parameters)),
    );
    tool.title = Some(schema.title);
    tool.annotations = Some(annotations);
    tool
}

fn hints_to_annotations(title: &str, hints: ToolHints) -> ToolAnnotations {
    ToolAnnotations {
        title: Some(title.to_string()),
        read_only_hint: Some(hints.read_only),
        destructive_hint: Some(hints.destructive),
        idempotent_hint: hints.idempotent,
        open_world_hint: Some(hints.open_world),
    }
}

/// MCP requires the input schema to be a JSON object; anything else is
/// wrapped in a minimal `{"type":"object"}` envelope.
fn value_to_object(v: serde_json::Value) -> JsonObject {
    use serde_json::{Map, Value};
    match v {
        Value::Object(m) => m,
        other => {
            let mut m = Map::new();
            m.insert("type".to_string(), Value::String("object".to_string()));
            m.insert("value".to_string(), other);
            m
        }
    }
}

/// Convert a [`ToolOutput`] into an rmcp [`CallToolResult`] with a single
/// text block.  The MCP `is_error` flag mirrors [`ToolOutput::is_error`].
pub fn output_to_call_result(output: ToolOutput) -> CallToolResult {
    let content = vec![Content::text(output.content)];
    if output.is_error {
        CallToolResult {
            content,
            is_error: Some(true),
            structured_content: None,
            meta: None,
        }
    } else {
        CallToolResult::success(content)
    }
}

// ─── Unit tests ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    fn make_schema(name: &str, hints: ToolHints, params: Value) -> ToolSchema {
        ToolSchema {
            name: name.to_string(),
            title: "Get Schema".to_string(),
            description: "Get a project's schema".to_string(),
            parameters: params,
            hints,
        }
    }

    #[test]
    fn tool_keeps_name_title_and_description() {
        let tool = schema_to_mcp_tool(make_schema("get_schema", ToolHints::READ, json!({})));
        assert_eq!(tool.name.as_ref(), "get_schema");
        assert_eq!(tool.title.as_deref(), Some("Get Schema"));
        assert_eq!(tool.description.as_deref(), Some("Get a project's schema"));
    }

    #[test]
    fn hints_become_annotations() {
        let tool = schema_to_mcp_tool(make_schema("x", ToolHints::READ, json!({})));
        let ann = tool.annotations.unwrap();
        assert_eq!(ann.title.as_deref(), Some("Get Schema"));
        assert_eq!(ann.read_only_hint, Some(true));
        assert_eq!(ann.destructive_hint, Some(false));
        assert_eq!(ann.idempotent_hint, None);
        assert_eq!(ann.open_world_hint, Some(false));

        let tool = schema_to_mcp_tool(make_schema("y", ToolHints::LOCAL_WRITE, json!({})));
        assert_eq!(tool.annotations.unwrap().idempotent_hint, Some(true));
    }

    #[test]
    fn object_schema_passes_through() {
        let params = json!({"type": "object", "properties": {"project_id": {"type": "string"}}});
        let tool = schema_to_mcp_tool(make_schema("x", ToolHints::READ, params));
        assert!(tool.input_schema.contains_key("properties"));
    }

    #[test]
    fn non_object_schema_gets_wrapped() {
        let tool = schema_to_mcp_tool(make_schema("x", ToolHints::READ, json!("nope")));
        assert_eq!(
            tool.input_schema.get("type"),
            Some(&Value::String("object".to_string()))
        );
    }

    #[test]
    fn error_flag_is_mirrored() {
        let result = output_to_call_result(ToolOutput::err("1", "Error: boom"));
        assert_eq!(result.is_error, Some(true));
        assert_eq!(result.content.len(), 1);

        let result = output_to_call_result(ToolOutput::ok("2", "{}"));
        assert_eq!(result.is_error, Some(false));
    }
}
