// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Gateway tools.  Each one forwards its arguments to a single
//! [`LogicBlokClient`] call and returns the gateway's JSON unchanged.

use std::sync::Arc;

use async_trait::async_trait;
use rbloks_client::{ClientPool, LogicBlokClient};
use rbloks_config::ServerMode;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::args::{optional_str, required_object, required_str, ToolError};
use crate::tool::{Tool, ToolCall, ToolHints, ToolOutput, BACKEND_MODES};
use crate::ToolContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    ListProjects,
    GetProject,
    GetSchema,
    GetUserInfo,
    GetJobStatus,
    GetProjectInfo,
    GetVersionHistory,
    GetTemplateSchemas,
    GetSubscriptionStatus,
    GetProjectUsage,
    GetSchemaAtVersion,
    CreateProject,
    UpdateSchema,
    DeployStaging,
    DeployProduction,
    DeleteProject,
    RollbackProject,
    RenameProject,
}

#[derive(Debug)]
struct Param {
    name: &'static str,
    kind: &'static str,
    description: &'static str,
    required: bool,
}

const PROJECT_ID: Param = Param {
    name: "project_id",
    kind: "string",
    description: "Project ID (UUID)",
    required: true,
};

/// Static description of one gateway tool.
#[derive(Debug)]
pub struct BackendToolDef {
    name: &'static str,
    title: &'static str,
    description: &'static str,
    params: &'static [Param],
    hints: ToolHints,
    op: Op,
}

const WRITE: ToolHints = ToolHints {
    read_only: false,
    destructive: false,
    idempotent: Some(false),
    open_world: true,
};

const IDEMPOTENT_WRITE: ToolHints = ToolHints {
    idempotent: Some(true),
    ..WRITE
};

const DESTRUCTIVE: ToolHints = ToolHints {
    destructive: true,
    ..WRITE
};

const READ: ToolHints = ToolHints {
    read_only: true,
    destructive: false,
    idempotent: None,
    open_world: false,
};

pub static BACKEND_TOOLS: &[BackendToolDef] = &[
    // ── read ────────────────────────────────────────────────────────────────
    BackendToolDef {
        name: "list_projects",
        title: "List Projects",
        description: "List all your RationalBloks projects with their status and URLs",
        params: &[],
        hints: READ,
        op: Op::ListProjects,
    },
    BackendToolDef {
        name: "get_project",
        title: "Get Project Details",
        description: "Get detailed information about a specific project",
        params: &[PROJECT_ID],
        hints: READ,
        op: Op::GetProject,
    },
    BackendToolDef {
        name: "get_schema",
        title: "Get Project Schema",
        description: "Get the JSON schema definition of a project in FLAT format. Returns the \
             schema structure where each table name maps directly to field definitions. This is \
             the same format required for create_project and update_schema.\n\n\
             USE CASES: review the current schema before making updates, copy a schema as a \
             template for new projects, verify schema structure after deployment, learn the \
             correct schema format by example.\n\n\
             The returned schema is FLAT: {table_name: {field_name: {type, properties}}}",
        params: &[PROJECT_ID],
        hints: READ,
        op: Op::GetSchema,
    },
    BackendToolDef {
        name: "get_user_info",
        title: "Get User Info",
        description: "Get information about the authenticated user",
        params: &[],
        hints: READ,
        op: Op::GetUserInfo,
    },
    BackendToolDef {
        name: "get_job_status",
        title: "Get Job Status",
        description: "Check the status of a deployment job.\n\n\
             STATUS VALUES: pending (job queued), running (deployment in progress), completed \
             (success), failed (deployment failed).\n\n\
             TIMELINE: a deployment typically takes 2-5 minutes. If the status stays 'running' \
             for more than 10 minutes, check get_project_info for detailed pod status. If the \
             status is 'failed', use get_project_info to see deployment errors and check the \
             schema format (must be FLAT, no 'fields' nesting).",
        params: &[Param {
            name: "job_id",
            kind: "string",
            description: "Job ID returned from deployment operations",
            required: true,
        }],
        hints: READ,
        op: Op::GetJobStatus,
    },
    BackendToolDef {
        name: "get_project_info",
        title: "Get Project Info",
        description: "Get detailed project info including deployment status and resource usage.\n\n\
             DEPLOYMENT STATUS: Running (healthy), Pending (starting), CrashLoopBackOff (init \
             container failed, usually a schema format error), ImagePullBackOff (image build \
             failed).\n\n\
             TROUBLESHOOTING: CrashLoopBackOff almost always means the schema is in the wrong \
             format (nested 'fields' key or missing 'type' properties); use get_schema to review \
             it. Replicas at 0/2 mean the migration runner init container is failing.",
        params: &[PROJECT_ID],
        hints: READ,
        op: Op::GetProjectInfo,
    },
    BackendToolDef {
        name: "get_version_history",
        title: "Get Version History",
        description: "Get the deployment and version history (git commits) for a project. \
             Shows all schema changes with commit SHA, timestamp and message.\n\n\
             USE CASES: review what changed between deployments, find the last working version \
             before issues started, get the commit SHA for rollback_project.",
        params: &[PROJECT_ID],
        hints: READ,
        op: Op::GetVersionHistory,
    },
    BackendToolDef {
        name: "get_template_schemas",
        title: "Get Template Schemas",
        description: "Get pre-built template schemas for common use cases. USE THIS FIRST when \
             creating a new project!\n\n\
             Templates show the CORRECT schema format: FLAT structure (no 'fields' nesting), a \
             'type' on every field, correctly configured foreign keys, and sensible field naming.\n\n\
             Available templates: e-commerce (products, orders, customers), team collaboration \
             (projects, tasks, users) and general purpose schemas. Use them directly with \
             create_project or adapt them.",
        params: &[],
        hints: READ,
        op: Op::GetTemplateSchemas,
    },
    BackendToolDef {
        name: "get_subscription_status",
        title: "Get Subscription Status",
        description: "Get your subscription tier, limits, and usage",
        params: &[],
        hints: READ,
        op: Op::GetSubscriptionStatus,
    },
    BackendToolDef {
        name: "get_project_usage",
        title: "Get Project Usage",
        description: "Get resource usage metrics (CPU, memory) for a project",
        params: &[PROJECT_ID],
        hints: READ,
        op: Op::GetProjectUsage,
    },
    BackendToolDef {
        name: "get_schema_at_version",
        title: "Get Schema at Version",
        description: "Get the schema as it was at a specific version/commit",
        params: &[
            PROJECT_ID,
            Param {
                name: "version",
                kind: "string",
                description: "Commit SHA of the version",
                required: true,
            },
        ],
        hints: READ,
        op: Op::GetSchemaAtVersion,
    },
    // ── write ───────────────────────────────────────────────────────────────
    BackendToolDef {
        name: "create_project",
        title: "Create Project",
        description: "Create a new RationalBloks project from a JSON schema.\n\n\
             CRITICAL RULES - READ BEFORE CREATING A SCHEMA:\n\n\
             1. FLAT FORMAT (REQUIRED):\n   \
                CORRECT: {users: {email: {type: \"string\", max_length: 255}}}\n   \
                WRONG:   {users: {fields: {email: {type: \"string\"}}}}\n   \
                Do NOT nest under a 'fields' key!\n\n\
             2. FIELD TYPE REQUIREMENTS:\n   \
                - string: MUST have \"max_length\" (e.g. max_length: 255)\n   \
                - decimal: MUST have \"precision\" and \"scale\" (e.g. precision: 10, scale: 2)\n   \
                - datetime: use \"datetime\", NOT \"timestamp\"\n   \
                - ALL fields: MUST have a \"type\" property\n\n\
             3. AUTOMATIC FIELDS (do not define): id (uuid, primary key), created_at, updated_at\n\n\
             4. USER AUTHENTICATION:\n   \
                NEVER create \"users\", \"customers\" or \"employees\" tables with email/password.\n   \
                Use the built-in app_users table:\n   \
                {\"employee_profiles\": {\"user_id\": {type: \"uuid\", foreign_key: \"app_users.id\", required: true}, \
                \"department\": {type: \"string\", max_length: 100}}}\n\n\
             5. AUTHORIZATION:\n   \
                Add user_id -> app_users.id to enable \"only see your own data\":\n   \
                {\"orders\": {\"user_id\": {type: \"uuid\", foreign_key: \"app_users.id\"}, \
                \"total\": {type: \"decimal\", precision: 10, scale: 2}}}\n\n\
             6. FIELD OPTIONS: required, unique, default, enum: [\"val1\", \"val2\"], foreign_key: \"table.id\"\n\n\
             AVAILABLE TYPES: string, text, integer, decimal, boolean, uuid, date, datetime, json\n\n\
             WORKFLOW:\n\
             1. Use get_template_schemas FIRST to see valid examples\n\
             2. Create a schema following ALL rules above\n\
             3. Call this tool\n\
             4. Monitor with get_job_status (2-5 min deployment) using the returned job_id",
        params: &[
            Param {
                name: "name",
                kind: "string",
                description: "Project name",
                required: true,
            },
            Param {
                name: "schema",
                kind: "object",
                description: "JSON schema in FLAT format (table_name → field_name → properties). \
                     Every field MUST have a 'type' property. Use get_template_schemas to see \
                     valid examples.",
                required: true,
            },
            Param {
                name: "description",
                kind: "string",
                description: "Optional project description",
                required: false,
            },
        ],
        hints: WRITE,
        op: Op::CreateProject,
    },
    BackendToolDef {
        name: "update_schema",
        title: "Update Schema",
        description: "Update a project's schema (saves to the database, does NOT deploy).\n\n\
             CRITICAL: follow ALL rules from create_project:\n\
             - FLAT format (no 'fields' nesting)\n\
             - string: MUST have max_length; decimal: MUST have precision + scale\n\
             - use \"datetime\", NOT \"timestamp\"\n\
             - do not define id, created_at, updated_at\n\
             - never create users/customers/employees tables (use app_users)\n\n\
             MIGRATION RULES:\n\
             - New fields MUST be \"required\": false OR have a \"default\" value\n\
             - A required field without default cannot be added to an existing table\n\
             - Safe: {new_field: {type: \"string\", max_length: 100, required: false}}\n\n\
             WORKFLOW:\n\
             1. get_schema to see the current schema\n\
             2. Modify it following ALL rules\n\
             3. update_schema (saves only)\n\
             4. deploy_staging to apply the changes\n\
             5. Monitor with get_job_status",
        params: &[
            PROJECT_ID,
            Param {
                name: "schema",
                kind: "object",
                description: "New JSON schema in FLAT format (table_name → field_name → \
                     properties). Every field MUST have a 'type' property.",
                required: true,
            },
        ],
        hints: IDEMPOTENT_WRITE,
        op: Op::UpdateSchema,
    },
    BackendToolDef {
        name: "deploy_staging",
        title: "Deploy to Staging",
        description: "Deploy a project to the staging environment. This triggers schema \
             validation, a Docker image build, a GitHub commit, a Kubernetes deployment and \
             database migrations.\n\n\
             The operation is ASYNCHRONOUS: it returns immediately with a job_id. Use \
             get_job_status with the job_id to monitor progress; a deployment typically takes \
             2-5 minutes.\n\n\
             If a deployment fails, check that the schema is FLAT, every field has a 'type', \
             foreign keys reference existing tables and no PostgreSQL reserved words are used \
             as table or field names.",
        params: &[PROJECT_ID],
        hints: WRITE,
        op: Op::DeployStaging,
    },
    BackendToolDef {
        name: "deploy_production",
        title: "Deploy to Production",
        description: "Promote staging to production (requires paid plan)",
        params: &[PROJECT_ID],
        hints: WRITE,
        op: Op::DeployProduction,
    },
    BackendToolDef {
        name: "delete_project",
        title: "Delete Project",
        description: "Delete a project (removes GitHub repo, K8s deployments, and database)",
        params: &[PROJECT_ID],
        hints: DESTRUCTIVE,
        op: Op::DeleteProject,
    },
    BackendToolDef {
        name: "rollback_project",
        title: "Rollback Project",
        description: "Rollback a project to a previous version.\n\n\
             WARNING: this reverts schema AND code to the specified commit. Database data is NOT \
             rolled back. Use get_version_history to find the commit SHA, and get_job_status to \
             monitor the redeployment.",
        params: &[
            PROJECT_ID,
            Param {
                name: "version",
                kind: "string",
                description: "Commit SHA or version to rollback to",
                required: true,
            },
            Param {
                name: "environment",
                kind: "string",
                description: "Environment: staging or production (default: staging)",
                required: false,
            },
        ],
        hints: DESTRUCTIVE,
        op: Op::RollbackProject,
    },
    BackendToolDef {
        name: "rename_project",
        title: "Rename Project",
        description: "Rename a project (changes display name, not project_code)",
        params: &[
            PROJECT_ID,
            Param {
                name: "name",
                kind: "string",
                description: "New display name for the project",
                required: true,
            },
        ],
        hints: ToolHints {
            open_world: false,
            ..IDEMPOTENT_WRITE
        },
        op: Op::RenameProject,
    },
];

/// One gateway tool bound to the shared client pool.
pub struct BackendTool {
    def: &'static BackendToolDef,
    pool: Arc<ClientPool>,
}

impl BackendTool {
    async fn run(&self, client: &LogicBlokClient, args: &Value) -> Result<Value, ToolError> {
        let project_id = || required_str(args, "project_id");
        let value = match self.def.op {
            Op::ListProjects => client.list_projects().await?,
            Op::GetProject => client.get_project(project_id()?).await?,
            Op::GetSchema => client.get_schema(project_id()?).await?,
            Op::GetUserInfo => client.get_user_info().await?,
            Op::GetJobStatus => client.get_job_status(required_str(args, "job_id")?).await?,
            Op::GetProjectInfo => client.get_project_info(project_id()?).await?,
            Op::GetVersionHistory => client.get_version_history(project_id()?).await?,
            Op::GetTemplateSchemas => client.get_template_schemas().await?,
            Op::GetSubscriptionStatus => client.get_subscription_status().await?,
            Op::GetProjectUsage => client.get_project_usage(project_id()?).await?,
            Op::GetSchemaAtVersion => {
                let id = project_id()?;
                let version = required_str(args, "version")?;
                client.get_schema_at_version(id, version).await?
            }
            Op::CreateProject => {
                let name = required_str(args, "name")?;
                let schema = required_object(args, "schema")?;
                let description = optional_str(args, "description");
                client.create_project(name, schema, description).await?
            }
            Op::UpdateSchema => {
                let id = project_id()?;
                let schema = required_object(args, "schema")?;
                client.update_schema(id, schema).await?
            }
            Op::DeployStaging => client.deploy_staging(project_id()?).await?,
            Op::DeployProduction => client.deploy_production(project_id()?).await?,
            Op::DeleteProject => client.delete_project(project_id()?).await?,
            Op::RollbackProject => {
                let id = project_id()?;
                let version = required_str(args, "version")?;
                let environment = optional_str(args, "environment").unwrap_or("staging");
                client.rollback_project(id, version, environment).await?
            }
            Op::RenameProject => {
                let id = project_id()?;
                let name = required_str(args, "name")?;
                client.rename_project(id, name).await?
            }
        };
        Ok(value)
    }
}

#[async_trait]
impl Tool for BackendTool {
    fn name(&self) -> &str {
        self.def.name
    }

    fn title(&self) -> &str {
        self.def.title
    }

    fn description(&self) -> &str {
        self.def.description
    }

    fn parameters_schema(&self) -> Value {
        let mut properties = Map::new();
        for p in self.def.params {
            properties.insert(
                p.name.to_string(),
                json!({ "type": p.kind, "description": p.description }),
            );
        }
        let required: Vec<&str> = self
            .def
            .params
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name)
            .collect();
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    fn hints(&self) -> ToolHints {
        self.def.hints
    }

    fn modes(&self) -> &[ServerMode] {
        BACKEND_MODES
    }

    async fn execute(&self, call: &ToolCall) -> ToolOutput {
        let client = match self.pool.client_for(call.api_key.as_deref()) {
            Ok(c) => c,
            Err(e) => return ToolOutput::error(&call.id, &e),
        };
        match self.run(&client, &call.args).await {
            Ok(value) => ToolOutput::json(&call.id, &value),
            Err(e) => {
                debug!(tool = self.def.name, error = %e, "gateway tool failed");
                ToolOutput::error(&call.id, &e)
            }
        }
    }
}

/// Every gateway tool, bound to `ctx`'s client pool.
pub fn tools(ctx: &ToolContext) -> Vec<Arc<dyn Tool>> {
    BACKEND_TOOLS
        .iter()
        .map(|def| {
            Arc::new(BackendTool {
                def,
                pool: Arc::clone(&ctx.pool),
            }) as Arc<dyn Tool>
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn eighteen_unique_tools() {
        assert_eq!(BACKEND_TOOLS.len(), 18);
        let names: HashSet<_> = BACKEND_TOOLS.iter().map(|d| d.name).collect();
        assert_eq!(names.len(), 18);
    }

    #[test]
    fn read_tools_are_read_only() {
        for def in BACKEND_TOOLS {
            let is_read = def.name.starts_with("get_") || def.name == "list_projects";
            assert_eq!(def.hints.read_only, is_read, "{}", def.name);
        }
    }

    #[test]
    fn only_delete_and_rollback_are_destructive() {
        let destructive: Vec<_> = BACKEND_TOOLS
            .iter()
            .filter(|d| d.hints.destructive)
            .map(|d| d.name)
            .collect();
        assert_eq!(destructive, ["delete_project", "rollback_project"]);
    }

    #[test]
    fn schema_lists_required_params_in_order() {
        let ctx = ToolContext::default();
        let tool = tools(&ctx)
            .into_iter()
            .find(|t| t.name() == "rollback_project")
            .unwrap();
        let schema = tool.parameters_schema();
        assert_eq!(schema["required"], json!(["project_id", "version"]));
        let keys: Vec<_> = schema["properties"].as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["project_id", "version", "environment"]);
        assert_eq!(schema["properties"]["environment"]["type"], "string");
    }

    #[test]
    fn parameterless_tools_have_empty_required() {
        let ctx = ToolContext::default();
        let tool = tools(&ctx).into_iter().find(|t| t.name() == "list_projects").unwrap();
        assert_eq!(
            tool.parameters_schema(),
            json!({ "type": "object", "properties": {}, "required": [] })
        );
    }
}
