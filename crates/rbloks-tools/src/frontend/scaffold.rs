// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use rbloks_client::ClientPool;
use rbloks_codegen::{scaffold_frontend, AppGenerator, AppRequest, StepReport};
use rbloks_config::{FrontendConfig, ServerMode};
use serde_json::{json, Value};
use tracing::info;

use super::{path_arg, project_arg, project_path_param, schema_param};
use crate::args::{optional_bool, optional_str, required_object, required_str, ToolError};
use crate::tool::{Tool, ToolCall, ToolHints, ToolOutput, FRONTEND_MODES};

/// Reports are always returned in full; one that aborted is flagged.
fn report_output(call_id: &str, report: &StepReport) -> ToolOutput {
    let mut out = ToolOutput::json(call_id, report);
    out.is_error = report.error.is_some();
    out
}

// ─── scaffold_frontend ───────────────────────────────────────────────────────

fn scaffold_args(args: &Value) -> Result<(PathBuf, &str, &Value), ToolError> {
    Ok((
        project_arg(args)?,
        required_str(args, "app_name")?,
        required_object(args, "schema")?,
    ))
}

pub struct ScaffoldFrontendTool {
    cfg: Arc<FrontendConfig>,
}

impl ScaffoldFrontendTool {
    pub fn new(cfg: Arc<FrontendConfig>) -> Self {
        Self { cfg }
    }
}

#[async_trait]
impl Tool for ScaffoldFrontendTool {
    fn name(&self) -> &str {
        "scaffold_frontend"
    }

    fn title(&self) -> &str {
        "Scaffold Frontend"
    }

    fn description(&self) -> &str {
        "APPLY ALL GENERATORS to an existing frontend project.\n\n\
         The RECOMMENDED tool when you already have a rationalbloksfront-based project (cloned \
         template or existing app) and want to generate everything from a schema.\n\n\
         STEPS (on your EXISTING project):\n\
         1. TypeScript types (src/types/generated.ts)\n\
         2. API service with the one-way pattern (src/services/appApi.ts)\n\
         3. List and create/edit views for each entity\n\
         4. Dashboard\n\
         5. App.tsx routes\n\
         6. Navbar configuration\n\
         7. API URL in .env (only when api_url is given)\n\n\
         NO CLONING and NO BACKEND CREATION. Use create_app to start from scratch.\n\n\
         Returns a step report: steps_completed, steps_failed, generated_files, next_steps."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "project_path": project_path_param("Absolute path to your existing frontend project"),
                "app_name": { "type": "string", "description": "Display name for the app" },
                "schema": schema_param("Database schema in FLAT format"),
                "api_url": {
                    "type": "string",
                    "description": "Backend API URL (optional - set in .env if provided)"
                }
            },
            "required": ["project_path", "app_name", "schema"]
        })
    }

    fn hints(&self) -> ToolHints {
        ToolHints::LOCAL_WRITE
    }

    fn modes(&self) -> &[ServerMode] {
        FRONTEND_MODES
    }

    async fn execute(&self, call: &ToolCall) -> ToolOutput {
        let args = &call.args;
        let (project, app_name, schema) = match scaffold_args(args) {
            Ok(v) => v,
            Err(e) => return ToolOutput::error(&call.id, &e),
        };
        let api_url = optional_str(args, "api_url");

        info!(project = %project.display(), "scaffolding frontend");
        let report = scaffold_frontend(&project, app_name, schema, api_url, &self.cfg);
        report_output(&call.id, &report)
    }
}

// ─── create_app ──────────────────────────────────────────────────────────────

fn app_args(args: &Value) -> Result<(&str, &str, PathBuf, &Value), ToolError> {
    Ok((
        required_str(args, "name")?,
        required_str(args, "description")?,
        path_arg(args, "destination")?,
        required_object(args, "schema")?,
    ))
}

pub struct CreateAppTool {
    cfg: Arc<FrontendConfig>,
    pool: Arc<ClientPool>,
}

impl CreateAppTool {
    pub fn new(cfg: Arc<FrontendConfig>, pool: Arc<ClientPool>) -> Self {
        Self { cfg, pool }
    }
}

#[async_trait]
impl Tool for CreateAppTool {
    fn name(&self) -> &str {
        "create_app"
    }

    fn title(&self) -> &str {
        "Create Complete App"
    }

    fn description(&self) -> &str {
        "CREATE A COMPLETE APPLICATION FROM SCRATCH.\n\n\
         Full automation: clone template + create backend + scaffold frontend. Use this when \
         starting completely fresh with no existing project.\n\n\
         STEPS:\n\
         1. Clone the rationalbloksfront template from GitHub\n\
         2. Create the backend API from the schema (RationalBloks API)\n\
         3. Wait for the backend deployment (2-5 minutes)\n\
         4. Generate TypeScript types\n\
         5. Generate the API service (one-way pattern)\n\
         6. Generate all views\n\
         7. Generate the dashboard\n\
         8. Update routes\n\
         9. Update the navbar\n\
         10. Remove template-specific files\n\
         11. Update package.json\n\
         12. Configure .env with the API URL\n\
         13. Run npm install\n\n\
         A failed clone stops the pipeline; any other failed step is reported in \
         steps_failed and generation continues.\n\n\
         REQUIRES network access to GitHub and the RationalBloks API. PREFER scaffold_frontend \
         if you already have a project."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": { "type": "string", "description": "Application name (e.g., 'TaskManager')" },
                "description": { "type": "string", "description": "What the app does" },
                "destination": { "type": "string", "description": "Parent directory to create project in" },
                "schema": schema_param("Backend schema in FLAT format"),
                "wait_for_deployment": {
                    "type": "boolean",
                    "description": "Wait for backend to deploy (default: true)"
                },
                "run_npm_install": {
                    "type": "boolean",
                    "description": "Run npm install after generation (default: true)"
                }
            },
            "required": ["name", "description", "destination", "schema"]
        })
    }

    fn hints(&self) -> ToolHints {
        ToolHints {
            read_only: false,
            destructive: false,
            idempotent: Some(false),
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

        let args = &call.args;
        let (name, description, destination, schema) = match app_args(args) {
            Ok(v) => v,
            Err(e) => return ToolOutput::error(&call.id, &e),
        };

        let request = AppRequest {
            name,
            description,
            destination: &destination,
            schema,
            wait_for_deployment: optional_bool(args, "wait_for_deployment", true),
            run_npm_install: optional_bool(args, "run_npm_install", true),
        };
        info!(app = name, destination = %destination.display(), "creating app");
        let report = AppGenerator::new(&*client, &self.cfg)
            .create_app(&request)
            .await;
        report_output(&call.id, &report)
    }
}
