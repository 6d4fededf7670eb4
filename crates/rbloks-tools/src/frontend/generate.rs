// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use rbloks_codegen::generate;
use rbloks_codegen::Table;
use rbloks_config::{FrontendConfig, ServerMode};
use serde_json::{json, Value};

use super::{files_output, project_arg, project_path_param, schema_arg, schema_param};
use crate::args::{optional_str, required_object, required_str, ToolError};
use crate::tool::{Tool, ToolCall, ToolHints, ToolOutput, FRONTEND_MODES};

const PROJECT_PATH: &str = "Absolute path to your frontend project";
const FLAT_SCHEMA: &str = "Database schema in FLAT format: {table: {field: {type, ...}}}";

fn table_arg(args: &Value) -> Result<Table, ToolError> {
    let name = required_str(args, "table_name")?;
    let fields = required_object(args, "fields")?;
    Ok(Table::from_fields(name, fields)?)
}

// ─── generate_types ──────────────────────────────────────────────────────────

pub struct GenerateTypesTool;

#[async_trait]
impl Tool for GenerateTypesTool {
    fn name(&self) -> &str {
        "generate_types"
    }

    fn title(&self) -> &str {
        "Generate TypeScript Types"
    }

    fn description(&self) -> &str {
        "Generate TypeScript interfaces from a database schema.\n\n\
         Creates src/types/generated.ts with:\n\
         - an interface per entity (e.g. Task, Project) including id, created_at, updated_at\n\
         - Create<Entity>Input and Update<Entity>Input types for forms\n\
         - enum fields typed as string literal unions\n\n\
         Works on any project: just point to its directory.\n\n\
         EXAMPLE OUTPUT:\n\
         ```typescript\n\
         export interface Task {\n  id: string;\n  title: string;\n  status?: string;\n  \
         created_at: string;\n  updated_at: string;\n}\n\n\
         export interface CreateTaskInput {\n  title: string;\n  status?: string;\n}\n\n\
         export type UpdateTaskInput = Partial<CreateTaskInput>;\n\
         ```\n\n\
         USE WHEN the backend schema changed and types must be regenerated, or when starting a \
         new frontend from the rationalbloksfront template."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "project_path": project_path_param(
                    "Absolute path to your frontend project (e.g., 'C:/projects/my-app')"
                ),
                "schema": schema_param(FLAT_SCHEMA)
            },
            "required": ["project_path", "schema"]
        })
    }

    fn hints(&self) -> ToolHints {
        ToolHints::LOCAL_WRITE
    }

    fn modes(&self) -> &[ServerMode] {
        FRONTEND_MODES
    }

    async fn execute(&self, call: &ToolCall) -> ToolOutput {
        let run = || -> Result<Vec<PathBuf>, ToolError> {
            let project = project_arg(&call.args)?;
            let schema = schema_arg(&call.args)?;
            Ok(vec![generate::generate_types(&project, &schema)?])
        };
        files_output(&call.id, run())
    }
}

// ─── generate_api_service ────────────────────────────────────────────────────

pub struct GenerateApiServiceTool {
    cfg: Arc<FrontendConfig>,
}

impl GenerateApiServiceTool {
    pub fn new(cfg: Arc<FrontendConfig>) -> Self {
        Self { cfg }
    }
}

#[async_trait]
impl Tool for GenerateApiServiceTool {
    fn name(&self) -> &str {
        "generate_api_service"
    }

    fn title(&self) -> &str {
        "Generate API Service"
    }

    fn description(&self) -> &str {
        "Generate the API service using the one-way pattern from the npm packages.\n\n\
         Creates src/services/appApi.ts with:\n\
         - createAuthApi from @rationalbloks/universalfront (auth + tokens)\n\
         - initApi + getApi from @rationalbloks/frontbuilderblok (generic CRUD)\n\
         - an ENTITIES constant for type-safe entity names\n\n\
         All CRUD operations go through getApi(); no per-entity methods are generated.\n\n\
         EXAMPLE OUTPUT:\n\
         ```typescript\n\
         const authApi = createAuthApi(API_URL);\n\
         initApi(authApi);\n\n\
         export const ENTITIES = {\n  TASKS: \"tasks\",\n  PROJECTS: \"projects\",\n} as const;\n\n\
         export { authApi, getApi };\n\
         ```\n\n\
         USAGE IN COMPONENTS:\n\
         ```typescript\n\
         const tasks = await getApi().getAll<Task>(ENTITIES.TASKS);\n\
         await getApi().create<Task>(ENTITIES.TASKS, data);\n\
         ```"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "project_path": project_path_param(PROJECT_PATH),
                "schema": schema_param("Database schema in FLAT format"),
                "api_url": {
                    "type": "string",
                    "description": "Backend API URL (optional - will use VITE_DATABASE_API_URL env var if not provided)"
                }
            },
            "required": ["project_path", "schema"]
        })
    }

    fn hints(&self) -> ToolHints {
        ToolHints::LOCAL_WRITE
    }

    fn modes(&self) -> &[ServerMode] {
        FRONTEND_MODES
    }

    async fn execute(&self, call: &ToolCall) -> ToolOutput {
        let run = || -> Result<Vec<PathBuf>, ToolError> {
            let project = project_arg(&call.args)?;
            let schema = schema_arg(&call.args)?;
            let api_url = optional_str(&call.args, "api_url");
            Ok(vec![generate::generate_api_service(
                &project, &schema, api_url, &self.cfg,
            )?])
        };
        files_output(&call.id, run())
    }
}

// ─── generate_entity_view / generate_entity_form ─────────────────────────────

fn table_schema(table_hint: &str, fields_hint: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "project_path": project_path_param(PROJECT_PATH),
            "table_name": {
                "type": "string",
                "description": format!("Name of the table/entity (e.g., {table_hint})")
            },
            "fields": { "type": "object", "description": fields_hint }
        },
        "required": ["project_path", "table_name", "fields"]
    })
}

pub struct GenerateEntityViewTool;

#[async_trait]
impl Tool for GenerateEntityViewTool {
    fn name(&self) -> &str {
        "generate_entity_view"
    }

    fn title(&self) -> &str {
        "Generate Entity View"
    }

    fn description(&self) -> &str {
        "Generate a list view component for ONE entity.\n\n\
         Creates src/components/views/<Entity>View.tsx with:\n\
         - a data table with up to five columns (JSON and owner fields are skipped)\n\
         - loading and error states\n\
         - edit and delete actions per row (getApi().remove())\n\
         - an \"Add\" button linking to the create form\n\n\
         EXAMPLE: table \"tasks\" with fields title, status, due_date creates TasksView.tsx \
         with columns Title, Status, Due Date."
    }

    fn parameters_schema(&self) -> Value {
        table_schema(
            "'tasks', 'projects'",
            "Field definitions for this table: {field_name: {type, required, ...}}",
        )
    }

    fn hints(&self) -> ToolHints {
        ToolHints::LOCAL_WRITE
    }

    fn modes(&self) -> &[ServerMode] {
        FRONTEND_MODES
    }

    async fn execute(&self, call: &ToolCall) -> ToolOutput {
        let run = || -> Result<Vec<PathBuf>, ToolError> {
            let project = project_arg(&call.args)?;
            let table = table_arg(&call.args)?;
            Ok(vec![generate::generate_list_view(&project, &table)?])
        };
        files_output(&call.id, run())
    }
}

pub struct GenerateEntityFormTool;

#[async_trait]
impl Tool for GenerateEntityFormTool {
    fn name(&self) -> &str {
        "generate_entity_form"
    }

    fn title(&self) -> &str {
        "Generate Entity Form"
    }

    fn description(&self) -> &str {
        "Generate a create/edit form component for ONE entity.\n\n\
         Creates src/components/views/<Entity>FormView.tsx with:\n\
         - inputs for all editable fields (text, number, switch, date, select for enums)\n\
         - create mode and edit mode (based on the :id URL parameter)\n\
         - required-field validation\n\
         - submit via getApi().create() / getApi().update()\n\n\
         EXAMPLE: table \"tasks\" with title (required), status (enum), due_date creates \
         TaskFormView.tsx with a required text input, a status select and a date picker."
    }

    fn parameters_schema(&self) -> Value {
        table_schema("'tasks'", "Field definitions for this table")
    }

    fn hints(&self) -> ToolHints {
        ToolHints::LOCAL_WRITE
    }

    fn modes(&self) -> &[ServerMode] {
        FRONTEND_MODES
    }

    async fn execute(&self, call: &ToolCall) -> ToolOutput {
        let run = || -> Result<Vec<PathBuf>, ToolError> {
            let project = project_arg(&call.args)?;
            let table = table_arg(&call.args)?;
            Ok(vec![generate::generate_form_view(&project, &table)?])
        };
        files_output(&call.id, run())
    }
}

// ─── generate_all_views ──────────────────────────────────────────────────────

pub struct GenerateAllViewsTool;

#[async_trait]
impl Tool for GenerateAllViewsTool {
    fn name(&self) -> &str {
        "generate_all_views"
    }

    fn title(&self) -> &str {
        "Generate All Views"
    }

    fn description(&self) -> &str {
        "Generate list views AND form views for ALL entities in the schema.\n\n\
         Creates <Entity>View.tsx (list) and <Entity>FormView.tsx (create/edit) for each \
         table. Use generate_entity_view / generate_entity_form for granular control."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "project_path": project_path_param(PROJECT_PATH),
                "schema": schema_param("Complete database schema in FLAT format")
            },
            "required": ["project_path", "schema"]
        })
    }

    fn hints(&self) -> ToolHints {
        ToolHints::LOCAL_WRITE
    }

    fn modes(&self) -> &[ServerMode] {
        FRONTEND_MODES
    }

    async fn execute(&self, call: &ToolCall) -> ToolOutput {
        let run = || -> Result<Vec<PathBuf>, ToolError> {
            let project = project_arg(&call.args)?;
            let schema = schema_arg(&call.args)?;
            Ok(generate::generate_all_views(&project, &schema)?)
        };
        files_output(&call.id, run())
    }
}

// ─── generate_dashboard ──────────────────────────────────────────────────────

pub struct GenerateDashboardTool;

#[async_trait]
impl Tool for GenerateDashboardTool {
    fn name(&self) -> &str {
        "generate_dashboard"
    }

    fn title(&self) -> &str {
        "Generate Dashboard"
    }

    fn description(&self) -> &str {
        "Generate a dashboard view with entity statistics.\n\n\
         Creates src/components/views/DashboardView.tsx with a welcome header showing the app \
         name, a count card per entity (fetched with getApi().getAll()) and quick links to \
         each entity list."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "project_path": project_path_param(PROJECT_PATH),
                "app_name": {
                    "type": "string",
                    "description": "Display name for the app (shown in dashboard header)"
                },
                "schema": schema_param("Complete database schema in FLAT format")
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
        let run = || -> Result<Vec<PathBuf>, ToolError> {
            let project = project_arg(&call.args)?;
            let app_name = required_str(&call.args, "app_name")?;
            let schema = schema_arg(&call.args)?;
            Ok(vec![generate::generate_dashboard(&project, app_name, &schema)?])
        };
        files_output(&call.id, run())
    }
}

// ─── update_routes ───────────────────────────────────────────────────────────

pub struct UpdateRoutesTool {
    cfg: Arc<FrontendConfig>,
}

impl UpdateRoutesTool {
    pub fn new(cfg: Arc<FrontendConfig>) -> Self {
        Self { cfg }
    }
}

#[async_trait]
impl Tool for UpdateRoutesTool {
    fn name(&self) -> &str {
        "update_routes"
    }

    fn title(&self) -> &str {
        "Update Routes"
    }

    fn description(&self) -> &str {
        "Rewrite src/App.tsx with routes for all generated views.\n\n\
         Includes imports for every view component, list routes (/<entity>), create routes \
         (/<entity>/new), edit routes (/<entity>/:id/edit) and the dashboard as the default \
         authenticated route, wrapped in the universalfront app provider.\n\n\
         Run this after generating views to wire up navigation."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "project_path": project_path_param(PROJECT_PATH),
                "schema": schema_param("Complete database schema (used to determine routes)")
            },
            "required": ["project_path", "schema"]
        })
    }

    fn hints(&self) -> ToolHints {
        ToolHints::LOCAL_WRITE
    }

    fn modes(&self) -> &[ServerMode] {
        FRONTEND_MODES
    }

    async fn execute(&self, call: &ToolCall) -> ToolOutput {
        let run = || -> Result<Vec<PathBuf>, ToolError> {
            let project = project_arg(&call.args)?;
            let schema = schema_arg(&call.args)?;
            Ok(vec![generate::update_routes(&project, &schema, &self.cfg)?])
        };
        files_output(&call.id, run())
    }
}

// ─── update_navbar ───────────────────────────────────────────────────────────

pub struct UpdateNavbarTool;

#[async_trait]
impl Tool for UpdateNavbarTool {
    fn name(&self) -> &str {
        "update_navbar"
    }

    fn title(&self) -> &str {
        "Update Navbar"
    }

    fn description(&self) -> &str {
        "Update the navigation bar configuration with app-specific links.\n\n\
         Writes src/config/Navbar.tsx with the app name and a navigation item for the \
         dashboard and for each entity."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "project_path": project_path_param(PROJECT_PATH),
                "app_name": { "type": "string", "description": "Display name for the app" },
                "schema": schema_param("Complete database schema (used to create nav items)")
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
        let run = || -> Result<Vec<PathBuf>, ToolError> {
            let project = project_arg(&call.args)?;
            let app_name = required_str(&call.args, "app_name")?;
            let schema = schema_arg(&call.args)?;
            Ok(vec![generate::update_navbar(&project, app_name, &schema)?])
        };
        files_output(&call.id, run())
    }
}
