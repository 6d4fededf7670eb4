// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::Arc;

use async_trait::async_trait;
use rbloks_client::ClientPool;
use rbloks_codegen::{clone_template, configure_api_url, template_structure};
use rbloks_config::{FrontendConfig, ServerMode};
use serde_json::{json, Value};
use tracing::info;

use super::{failure, path_arg, project_arg, project_path_param, schema_param};
use crate::args::{optional_str, optional_u64, required_object, required_str, ToolError};
use crate::tool::{Tool, ToolCall, ToolHints, ToolOutput, FRONTEND_MODES};

/// Levels shown by `get_template_structure` unless asked otherwise.
const DEFAULT_TEMPLATE_DEPTH: u64 = 3;

// ─── clone_template ──────────────────────────────────────────────────────────

pub struct CloneTemplateTool {
    cfg: Arc<FrontendConfig>,
}

impl CloneTemplateTool {
    pub fn new(cfg: Arc<FrontendConfig>) -> Self {
        Self { cfg }
    }
}

#[async_trait]
impl Tool for CloneTemplateTool {
    fn name(&self) -> &str {
        "clone_template"
    }

    fn title(&self) -> &str {
        "Clone Template"
    }

    fn description(&self) -> &str {
        "Clone the rationalbloksfront template from GitHub.\n\n\
         Shallow-clones the template into <destination>/<project_name>, removes its .git \
         directory and initializes a fresh git repository.\n\n\
         AFTER CLONING, use scaffold_frontend to generate your app code."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "destination": { "type": "string", "description": "Parent directory to clone into" },
                "project_name": { "type": "string", "description": "Name for the project folder" }
            },
            "required": ["destination", "project_name"]
        })
    }

    fn hints(&self) -> ToolHints {
        ToolHints {
            read_only: false,
            destructive: false,
            idempotent: None,
            open_world: true,
        }
    }

    fn modes(&self) -> &[ServerMode] {
        FRONTEND_MODES
    }

    async fn execute(&self, call: &ToolCall) -> ToolOutput {
        let args = (
            path_arg(&call.args, "destination"),
            required_str(&call.args, "project_name"),
        );
        let (destination, project_name) = match args {
            (Ok(d), Ok(n)) => (d, n),
            (Err(e), _) | (_, Err(e)) => return ToolOutput::error(&call.id, &e),
        };
        match clone_template(&destination, project_name, &self.cfg).await {
            Ok(outcome) => ToolOutput::json(&call.id, &outcome),
            Err(e) => failure(&call.id, &e.into()),
        }
    }
}

// ─── configure_api_url ───────────────────────────────────────────────────────

pub struct ConfigureApiUrlTool;

#[async_trait]
impl Tool for ConfigureApiUrlTool {
    fn name(&self) -> &str {
        "configure_api_url"
    }

    fn title(&self) -> &str {
        "Configure API URL"
    }

    fn description(&self) -> &str {
        "Set the backend API URL in the project's .env file.\n\n\
         Updates VITE_DATABASE_API_URL to point to your RationalBloks backend. Creates .env \
         from .env.example if needed."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "project_path": project_path_param("Path to the frontend project"),
                "api_url": { "type": "string", "description": "Backend API URL" }
            },
            "required": ["project_path", "api_url"]
        })
    }

    fn hints(&self) -> ToolHints {
        ToolHints {
            idempotent: None,
            ..ToolHints::LOCAL_WRITE
        }
    }

    fn modes(&self) -> &[ServerMode] {
        FRONTEND_MODES
    }

    async fn execute(&self, call: &ToolCall) -> ToolOutput {
        let run = || -> Result<Value, ToolError> {
            let project = project_arg(&call.args)?;
            let api_url = required_str(&call.args, "api_url")?;
            let configured = configure_api_url(&project, api_url)?;
            Ok(json!(configured))
        };
        match run() {
            Ok(v) => ToolOutput::json(&call.id, &v),
            Err(e) => failure(&call.id, &e),
        }
    }
}

// ─── create_backend ──────────────────────────────────────────────────────────

pub struct CreateBackendTool {
    pool: Arc<ClientPool>,
}

impl CreateBackendTool {
    pub fn new(pool: Arc<ClientPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Tool for CreateBackendTool {
    fn name(&self) -> &str {
        "create_backend"
    }

    fn title(&self) -> &str {
        "Create Backend"
    }

    fn description(&self) -> &str {
        "Create a backend API project via RationalBloks.\n\n\
         Same call as the backend create_project tool. Returns project_id, project_code and \
         job_id; once deployed, pass the staging URL to configure_api_url."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": { "type": "string", "description": "Project name" },
                "schema": schema_param("Database schema in FLAT format"),
                "description": { "type": "string", "description": "Project description" }
            },
            "required": ["name", "schema"]
        })
    }

    fn hints(&self) -> ToolHints {
        ToolHints {
            read_only: false,
            destructive: false,
            idempotent: None,
            open_world: true,
        }
    }

    fn modes(&self) -> &[ServerMode] {
        FRONTEND_MODES
    }

    async fn execute(&self, call: &ToolCall) -> ToolOutput {
        let client = match self.pool.client_for(call.api_key.as_deref()) {
            Ok(c) => c,
            Err(e) => return ToolOutput::error(&call.id, &e),
        };
        let args = (
            required_str(&call.args, "name"),
            required_object(&call.args, "schema"),
        );
        let (name, schema) = match args {
            (Ok(n), Ok(s)) => (n, s),
            (Err(e), _) | (_, Err(e)) => return ToolOutput::error(&call.id, &e),
        };
        let description = optional_str(&call.args, "description");

        info!(name, "creating backend project");
        match client.create_project(name, schema, description).await {
            Ok(v) => ToolOutput::json(&call.id, &v),
            Err(e) => ToolOutput::error(&call.id, &e),
        }
    }
}

// ─── get_template_structure ──────────────────────────────────────────────────

pub struct GetTemplateStructureTool {
    cfg: Arc<FrontendConfig>,
}

impl GetTemplateStructureTool {
    pub fn new(cfg: Arc<FrontendConfig>) -> Self {
        Self { cfg }
    }
}

#[async_trait]
impl Tool for GetTemplateStructureTool {
    fn name(&self) -> &str {
        "get_template_structure"
    }

    fn title(&self) -> &str {
        "Get Template Structure"
    }

    fn description(&self) -> &str {
        "Get the file structure of the rationalbloksfront template.\n\n\
         Returns a tree of key directories and files, the files worth editing first and the \
         npm dependencies. `path` narrows the tree to a subdirectory (e.g. 'src/components'); \
         deeper levels than `max_depth` are summarized as entry counts."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": { "type": "string", "description": "Subdirectory to explore (empty for root)" },
                "max_depth": { "type": "integer", "description": "Maximum depth (default: 3)" }
            },
            "required": []
        })
    }

    fn hints(&self) -> ToolHints {
        ToolHints::READ
    }

    fn modes(&self) -> &[ServerMode] {
        FRONTEND_MODES
    }

    async fn execute(&self, call: &ToolCall) -> ToolOutput {
        let path = optional_str(&call.args, "path").unwrap_or("");
        let depth = optional_u64(&call.args, "max_depth", DEFAULT_TEMPLATE_DEPTH);
        let depth = usize::try_from(depth).unwrap_or(usize::MAX);
        match template_structure(path, depth, &self.cfg) {
            Ok(v) => ToolOutput::json(&call.id, &v),
            Err(e) => failure(&call.id, &e.into()),
        }
    }
}
