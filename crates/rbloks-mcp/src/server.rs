// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//!
//! [`RationalBloksServer`], the rmcp [`ServerHandler`] implementation.
//!
//! Wraps a [`ToolRegistry`] built for one [`ServerMode`] and implements the
//! MCP tools, prompts and resources methods.  Lifecycle methods (initialize,
//! ping, shutdown) use the rmcp defaults.
//!
//! The server is stateless: each call resolves its API key, runs the tool
//! and returns.  Over stdio the key is fixed at startup; over HTTP it comes
//! from the `Authorization` header of the request being served.

use std::sync::Arc;

use rbloks_client::extract_bearer;
use rbloks_config::ServerMode;
use rbloks_tools::{ToolCall, ToolRegistry};
use rmcp::{
    handler::server::ServerHandler,
    model::{
        CallToolRequestParams, CallToolResult, GetPromptRequestParams, GetPromptResult, Icon,
        Implementation, ListPromptsResult, ListResourcesResult, ListToolsResult,
        PaginatedRequestParams, ReadResourceRequestParams, ReadResourceResult,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    ErrorData as McpError,
};
use tracing::debug;
use uuid::Uuid;

use crate::bridge::{output_to_call_result, schema_to_mcp_tool};
use crate::{prompts, resources};

pub const SERVER_NAME: &str = "rationalbloks";
pub const SERVER_TITLE: &str = "RationalBloks MCP";
pub const WEBSITE_URL: &str = "https://rationalbloks.com";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Where tool calls get their API key from.
#[derive(Clone)]
pub enum ApiKeySource {
    /// Validated once at startup (stdio).
    Fixed(String),
    /// `Authorization: Bearer` header of each HTTP request.
    PerRequest,
}

impl std::fmt::Debug for ApiKeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiKeySource::Fixed(_) => f.write_str("Fixed(<redacted>)"),
            ApiKeySource::PerRequest => f.write_str("PerRequest"),
        }
    }
}

/// RationalBloks MCP server.
///
/// Create with [`RationalBloksServer::new`] and then call
/// [`rmcp::ServiceExt::serve`] or hand it to [`crate::serve_http`].
#[derive(Clone)]
pub struct RationalBloksServer {
    registry: Arc<ToolRegistry>,
    mode: ServerMode,
    keys: ApiKeySource,
}

impl RationalBloksServer {
    pub fn new(registry: Arc<ToolRegistry>, mode: ServerMode, keys: ApiKeySource) -> Self {
        Self {
            registry,
            mode,
            keys,
        }
    }

    pub fn mode(&self) -> ServerMode {
        self.mode
    }

    fn api_key(&self, context: &RequestContext<RoleServer>) -> Option<String> {
        match &self.keys {
            ApiKeySource::Fixed(key) => Some(key.clone()),
            ApiKeySource::PerRequest => {
                bearer_from_parts(context.extensions.get::<http::request::Parts>())
            }
        }
    }
}

fn bearer_from_parts(parts: Option<&http::request::Parts>) -> Option<String> {
    let header = parts?
        .headers
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    extract_bearer(header)
}

fn icons() -> Vec<Icon> {
    vec![
        Icon {
            src: format!("{WEBSITE_URL}/logo.svg"),
            mime_type: Some("image/svg+xml".into()),
            sizes: None,
        },
        Icon {
            src: format!("{WEBSITE_URL}/logo.png"),
            mime_type: Some("image/png".into()),
            sizes: Some(vec!["128x128".into()]),
        },
    ]
}

/// Agent-facing guidance for `mode`; full mode carries both texts.
pub fn instructions(mode: ServerMode) -> String {
    match mode {
        ServerMode::Backend => BACKEND_INSTRUCTIONS.to_string(),
        ServerMode::Frontend => FRONTEND_INSTRUCTIONS.to_string(),
        ServerMode::Full => format!("{BACKEND_INSTRUCTIONS}\n\n{FRONTEND_INSTRUCTIONS}"),
    }
}

impl ServerHandler for RationalBloksServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_prompts()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: SERVER_NAME.into(),
                title: Some(SERVER_TITLE.into()),
                version: VERSION.into(),
                icons: Some(icons()),
                website_url: Some(WEBSITE_URL.into()),
                ..Default::default()
            },
            instructions: Some(instructions(self.mode)),
            ..ServerInfo::default()
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        let registry = self.registry.clone();
        async move {
            let tools = registry
                .schemas()
                .into_iter()
                .map(schema_to_mcp_tool)
                .collect();
            Ok(ListToolsResult {
                tools,
                next_cursor: None,
                meta: None,
            })
        }
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let args = request
            .arguments
            .map(serde_json::Value::Object)
            .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new()));

        let call = ToolCall {
            id: Uuid::new_v4().to_string(),
            name: request.name.to_string(),
            args,
            api_key: self.api_key(&context),
        };
        debug!(?call, "tool call");

        let output = self.registry.execute(&call).await;
        Ok(output_to_call_result(output))
    }

    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        Ok(ListPromptsResult::with_all_items(prompts::list(self.mode)))
    }

    async fn get_prompt(
        &self,
        request: GetPromptRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        prompts::get(self.mode, &request.name, request.arguments.as_ref())
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult::with_all_items(resources::list()))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        resources::read(&request.uri)
    }
}

// ─── Instructions ────────────────────────────────────────────────────────────

const BACKEND_INSTRUCTIONS: &str = "\
RationalBloks MCP Server - Backend Mode

Build production REST APIs from JSON schemas in seconds.

CRITICAL SCHEMA RULES (read BEFORE creating any schema):

1. FLAT FORMAT (REQUIRED):
   CORRECT: {\"users\": {\"email\": {\"type\": \"string\", \"max_length\": 255}}}
   WRONG:   {\"users\": {\"fields\": {\"email\": {\"type\": \"string\"}}}}
   Never nest under a 'fields' key! Deployment will fail.

2. FIELD TYPE REQUIREMENTS:
   - string:   MUST have \"max_length\" (e.g., \"max_length\": 255)
   - decimal:  MUST have \"precision\" and \"scale\" (e.g., \"precision\": 10, \"scale\": 2)
   - datetime: use \"datetime\", NOT \"timestamp\"
   - all fields: MUST have a \"type\" property

3. AUTOMATIC FIELDS (do NOT define these):
   - id (uuid, primary key)
   - created_at (datetime)
   - updated_at (datetime)

4. USER AUTHENTICATION:
   NEVER create \"users\", \"customers\", \"employees\" or \"members\" tables with email/password.
   ALWAYS use the built-in app_users table, e.g.
   {\"employee_profiles\": {\"user_id\": {\"type\": \"uuid\", \"foreign_key\": \"app_users.id\", \"required\": true}}}

5. AUTHORIZATION (user ownership):
   Add a user_id foreign key to app_users.id for user-owned resources; rows are then
   visible only to their owner.

6. SCHEMA UPDATES (migrations):
   New fields MUST be \"required\": false OR have a \"default\" value.

7. FOREIGN KEYS: \"foreign_key\": \"table_name.id\"

8. FIELD OPTIONS: required, unique, default, enum

WORKFLOW:
1. Use get_template_schemas to see complete valid examples
2. Create a schema following ALL rules above
3. Call create_project with the schema
4. Monitor with get_job_status (deployment takes 2-5 minutes)
5. CrashLoopBackOff means a schema format error (check rules 1-2)
6. Use get_project_info for detailed deployment status

Available: 18 backend tools for projects, schemas and deployments.
Full documentation: https://infra.rationalbloks.com/documentation";

const FRONTEND_INSTRUCTIONS: &str = "\
RationalBloks MCP Server - Frontend Mode

GENERATION TOOLS (work on YOUR existing project):
- generate_types: TypeScript interfaces from schema
- generate_api_service: API client with CRUD operations
- generate_entity_view: list view for ONE entity
- generate_entity_form: create/edit form for ONE entity
- generate_all_views: all views for all entities
- generate_dashboard: dashboard with stats
- update_routes: wire up routes in App.tsx
- update_navbar: update navigation links

SCAFFOLD TOOLS:
- scaffold_frontend: apply ALL generators to an existing project (RECOMMENDED)
- create_app: full automation from scratch (clone + backend + scaffold)

UTILITY TOOLS:
- clone_template: get a fresh template from GitHub
- configure_api_url: set the .env API URL
- create_backend: create a backend via the API
- get_template_structure: explore the template

RECOMMENDED WORKFLOW:
1. Already have a project? Use scaffold_frontend
2. Need to clone first? Use clone_template, then scaffold_frontend
3. Starting from zero? Use create_app

Available: 14 frontend tools.";

// ─── Unit tests ───────────────────────────────────────────────────────────────
