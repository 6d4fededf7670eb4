// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use rbloks_config::ServerMode;
use tracing::debug;

use crate::tool::{Tool, ToolCall, ToolHints, ToolOutput};
use crate::{backend, frontend, ToolContext};

/// Everything a protocol layer needs to advertise a tool.
#[derive(Debug, Clone)]
pub struct ToolSchema {
    pub name: String,
    pub title: String,
    pub description: String,
    pub parameters: serde_json::Value,
    pub hints: ToolHints,
}

/// Central registry holding the tools of one server instance.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: HashMap::new() }
    }

    pub fn register(&mut self, tool: impl Tool + 'static) {
        self.insert(Arc::new(tool));
    }

    fn insert(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Schemas of all registered tools, sorted by name.
    pub fn schemas(&self) -> Vec<ToolSchema> {
        let mut schemas: Vec<ToolSchema> = self
            .tools
            .values()
            .map(|t| ToolSchema {
                name: t.name().to_string(),
                title: t.title().to_string(),
                description: t.description().to_string(),
                parameters: t.parameters_schema(),
                hints: t.hints(),
            })
            .collect();
        schemas.sort_by(|a, b| a.name.cmp(&b.name));
        schemas
    }

    pub async fn execute(&self, call: &ToolCall) -> ToolOutput {
        match self.tools.get(&call.name) {
            Some(tool) => {
                debug!(tool = %call.name, id = %call.id, "executing tool");
                tool.execute(call).await
            }
            None => ToolOutput::err(&call.id, format!("unknown tool: {}", call.name)),
        }
    }

    /// Sorted tool names.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the registry for `mode`.
///
/// `allowed_names` is an optional comma-separated list of tool names to
/// include.  `"all"` (or `None`) keeps every tool of the mode; names that do
/// not match a tool are ignored.
pub fn build_registry(mode: ServerMode, ctx: &ToolContext, allowed_names: Option<&str>) -> ToolRegistry {
    let filter: Option<HashSet<&str>> = match allowed_names.map(str::trim) {
        None | Some("") | Some("all") => None,
        Some(list) => Some(list.split(',').map(str::trim).collect()),
    };

    let mut reg = ToolRegistry::new();
    for tool in backend::tools(ctx).into_iter().chain(frontend::tools(ctx)) {
        if !tool.modes().contains(&mode) {
            continue;
        }
        if filter.as_ref().is_some_and(|set| !set.contains(tool.name())) {
            continue;
        }
        reg.insert(tool);
    }
    debug!(%mode, tools = reg.len(), "tool registry built");
    reg
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use serde_json::{json, Value};

    use super::*;

    /// Minimal tool for registry tests.
    struct EchoTool {
        name: &'static str,
    }

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            self.name
        }
        fn title(&self) -> &str {
            "Echo"
        }
        fn description(&self) -> &str {
            "echoes its input"
        }
        fn parameters_schema(&self) -> Value {
            json!({ "type": "object" })
        }
        fn hints(&self) -> ToolHints {
            ToolHints::READ
        }
        fn modes(&self) -> &[ServerMode] {
            &[ServerMode::Full]
        }
        async fn execute(&self, call: &ToolCall) -> ToolOutput {
            ToolOutput::ok(&call.id, format!("echo:{}", call.args))
        }
    }

    fn call(name: &str) -> ToolCall {
        ToolCall {
            id: "c1".into(),
            name: name.into(),
            args: json!({ "x": 1 }),
            api_key: None,
        }
    }

    #[tokio::test]
    async fn execute_dispatches_by_name() {
        let mut reg = ToolRegistry::new();
        reg.register(EchoTool { name: "echo" });
        let out = reg.execute(&call("echo")).await;
        assert!(!out.is_error);
        assert_eq!(out.content, "echo:{\"x\":1}");
        assert_eq!(out.call_id, "c1");
    }

    #[tokio::test]
    async fn unknown_tool_is_an_error_output() {
        let reg = ToolRegistry::new();
        let out = reg.execute(&call("nope")).await;
        assert!(out.is_error);
        assert_eq!(out.content, "unknown tool: nope");
    }

    #[test]
    fn schemas_are_sorted() {
        let mut reg = ToolRegistry::new();
        reg.register(EchoTool { name: "zeta" });
        reg.register(EchoTool { name: "alpha" });
        let names: Vec<_> = reg.schemas().into_iter().map(|s| s.name).collect();
        assert_eq!(names, ["alpha", "zeta"]);
        assert_eq!(reg.len(), 2);
    }
}
