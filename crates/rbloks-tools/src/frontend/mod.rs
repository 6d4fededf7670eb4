// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Frontend tools.  Generation tools work on any existing project directory;
//! scaffold tools chain them; utility tools clone, configure and provision.
//!
//! Every generated file uses the one-way pattern: `createAuthApi` for auth,
//! `initApi`/`getApi` for CRUD, and an `ENTITIES` constant naming tables.

mod generate;
mod scaffold;
mod utility;

pub use generate::{
    GenerateAllViewsTool, GenerateApiServiceTool, GenerateDashboardTool, GenerateEntityFormTool,
    GenerateEntityViewTool, GenerateTypesTool, UpdateNavbarTool, UpdateRoutesTool,
};
pub use scaffold::{CreateAppTool, ScaffoldFrontendTool};
pub use utility::{
    CloneTemplateTool, ConfigureApiUrlTool, CreateBackendTool, GetTemplateStructureTool,
};

use std::path::PathBuf;
use std::sync::Arc;

use rbloks_codegen::FlatSchema;
use rbloks_config::expand_path;
use serde::Serialize;
use serde_json::{json, Value};

use crate::args::{required_object, required_str, ToolError};
use crate::tool::{Tool, ToolOutput};
use crate::ToolContext;

/// Every frontend tool, bound to `ctx`.
pub fn tools(ctx: &ToolContext) -> Vec<Arc<dyn Tool>> {
    let cfg = &ctx.frontend;
    vec![
        Arc::new(GenerateTypesTool) as Arc<dyn Tool>,
        Arc::new(GenerateApiServiceTool::new(Arc::clone(cfg))),
        Arc::new(GenerateEntityViewTool),
        Arc::new(GenerateEntityFormTool),
        Arc::new(GenerateAllViewsTool),
        Arc::new(GenerateDashboardTool),
        Arc::new(UpdateRoutesTool::new(Arc::clone(cfg))),
        Arc::new(UpdateNavbarTool),
        Arc::new(ScaffoldFrontendTool::new(Arc::clone(cfg))),
        Arc::new(CreateAppTool::new(Arc::clone(cfg), Arc::clone(&ctx.pool))),
        Arc::new(CloneTemplateTool::new(Arc::clone(cfg))),
        Arc::new(ConfigureApiUrlTool),
        Arc::new(CreateBackendTool::new(Arc::clone(&ctx.pool))),
        Arc::new(GetTemplateStructureTool::new(Arc::clone(cfg))),
    ]
}

// ─── Shared argument handling ────────────────────────────────────────────────

fn path_arg(args: &Value, name: &'static str) -> Result<PathBuf, ToolError> {
    Ok(expand_path(required_str(args, name)?))
}

fn project_arg(args: &Value) -> Result<PathBuf, ToolError> {
    path_arg(args, "project_path")
}

fn schema_arg(args: &Value) -> Result<FlatSchema, ToolError> {
    Ok(FlatSchema::from_value(required_object(args, "schema")?)?)
}

fn project_path_param(description: &str) -> Value {
    json!({ "type": "string", "description": description })
}

fn schema_param(description: &str) -> Value {
    json!({ "type": "object", "description": description })
}

// ─── Shared output handling ──────────────────────────────────────────────────

#[derive(Serialize)]
struct FilesWritten {
    success: bool,
    files: Vec<String>,
}

/// `{success: true, files: [...]}`, or the failure.
fn files_output(call_id: &str, result: Result<Vec<PathBuf>, ToolError>) -> ToolOutput {
    match result {
        Ok(files) => ToolOutput::json(
            call_id,
            &FilesWritten {
                success: true,
                files: files.iter().map(|p| p.display().to_string()).collect(),
            },
        ),
        Err(e) => failure(call_id, &e),
    }
}

/// Generator failures keep their suggestion; argument and gateway errors
/// are plain `Error: ...` text.
fn failure(call_id: &str, e: &ToolError) -> ToolOutput {
    match e {
        ToolError::Codegen(err) => {
            let mut body = json!({ "success": false, "error": err.to_string() });
            if let Some(suggestion) = err.suggestion() {
                body["suggestion"] = json!(suggestion);
            }
            let mut out = ToolOutput::json(call_id, &body);
            out.is_error = true;
            out
        }
        other => ToolOutput::error(call_id, other),
    }
}
