// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Prompt templates offered to MCP clients, one pair per tool family.

use rbloks_config::ServerMode;
use rmcp::model::{
    GetPromptResult, JsonObject, Prompt, PromptArgument, PromptMessage, PromptMessageRole,
};
use rmcp::ErrorData as McpError;

struct PromptArg {
    name: &'static str,
    description: &'static str,
    required: bool,
}

struct PromptDef {
    name: &'static str,
    title: &'static str,
    description: &'static str,
    family: ServerMode,
    args: &'static [PromptArg],
    render: fn(&Args<'_>) -> String,
}

/// Prompt arguments with per-prompt fallbacks for absent values.
struct Args<'a>(Option<&'a JsonObject>);

impl Args<'_> {
    fn get(&self, name: &str, default: &str) -> String {
        match self.0.and_then(|m| m.get(name)) {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Null) | None => default.to_string(),
            Some(other) => other.to_string(),
        }
    }
}

static PROMPTS: &[PromptDef] = &[
    PromptDef {
        name: "create-project-from-description",
        title: "Create Project from Description",
        description: "Generate a complete RationalBloks project schema from a plain English description",
        family: ServerMode::Backend,
        args: &[PromptArg {
            name: "description",
            description: "Plain English description of the data model you want to create",
            required: true,
        }],
        render: render_create_project,
    },
    PromptDef {
        name: "fix-schema-errors",
        title: "Fix Schema Errors",
        description: "Analyze and fix common schema format errors",
        family: ServerMode::Backend,
        args: &[
            PromptArg {
                name: "schema",
                description: "The JSON schema that is causing errors",
                required: true,
            },
            PromptArg {
                name: "error_message",
                description: "The error message you received",
                required: false,
            },
        ],
        render: render_fix_schema,
    },
    PromptDef {
        name: "scaffold-from-schema",
        title: "Scaffold Frontend from Schema",
        description: "Generate frontend code for an existing project using a schema",
        family: ServerMode::Frontend,
        args: &[
            PromptArg {
                name: "project_path",
                description: "Path to your existing frontend project",
                required: true,
            },
            PromptArg {
                name: "app_name",
                description: "Display name for your app",
                required: true,
            },
        ],
        render: render_scaffold,
    },
    PromptDef {
        name: "create-fullstack-app",
        title: "Create Fullstack App",
        description: "Create a complete fullstack application from scratch",
        family: ServerMode::Frontend,
        args: &[
            PromptArg {
                name: "app_name",
                description: "Name for your application",
                required: true,
            },
            PromptArg {
                name: "description",
                description: "Description of what the app should do",
                required: true,
            },
            PromptArg {
                name: "destination",
                description: "Directory to create the project in",
                required: true,
            },
        ],
        render: render_fullstack,
    },
];

/// Prompts visible in `mode`.
pub fn list(mode: ServerMode) -> Vec<Prompt> {
    PROMPTS
        .iter()
        .filter(|p| mode.includes(p.family))
        .map(|p| {
            let args = p
                .args
                .iter()
                .map(|a| PromptArgument {
                    name: a.name.to_string(),
                    title: None,
                    description: Some(a.description.to_string()),
                    required: Some(a.required),
                })
                .collect();
            let mut prompt = Prompt::new(p.name, Some(p.description), Some(args));
            prompt.title = Some(p.title.to_string());
            prompt
        })
        .collect()
}

/// Render prompt `name` with `arguments`.  Prompts outside `mode` are
/// reported as unknown.
pub fn get(
    mode: ServerMode,
    name: &str,
    arguments: Option<&JsonObject>,
) -> Result<GetPromptResult, McpError> {
    let def = PROMPTS
        .iter()
        .find(|p| p.name == name && mode.includes(p.family))
        .ok_or_else(|| McpError::invalid_params(format!("Unknown prompt: {name}"), None))?;

    let text = (def.render)(&Args(arguments));
    Ok(GetPromptResult {
        description: Some(def.description.to_string()),
        messages: vec![PromptMessage::new_text(PromptMessageRole::User, text)],
    })
}

// ─── Templates ───────────────────────────────────────────────────────────────

const SCHEMA_RULES: &str = "\
1. FLAT FORMAT (REQUIRED):
   CORRECT: {\"users\": {\"email\": {\"type\": \"string\", \"max_length\": 255}}}
   WRONG:   {\"users\": {\"fields\": {\"email\": {\"type\": \"string\"}}}}
   DO NOT nest under 'fields' key!

2. FIELD TYPE REQUIREMENTS:
   - string: MUST have \"max_length\" (e.g., \"max_length\": 255)
   - decimal: MUST have \"precision\" and \"scale\" (e.g., \"precision\": 10, \"scale\": 2)
   - datetime: Use \"datetime\" NOT \"timestamp\"
   - ALL fields: MUST have \"type\" property

3. AUTOMATIC FIELDS (DON'T define):
   - id (uuid, primary key)
   - created_at (datetime)
   - updated_at (datetime)

4. USER AUTHENTICATION:
   NEVER create \"users\", \"customers\", \"employees\", \"members\" tables
   USE the built-in app_users table

   Example:
   {
     \"employee_profiles\": {
       \"user_id\": {\"type\": \"uuid\", \"foreign_key\": \"app_users.id\", \"required\": true},
       \"department\": {\"type\": \"string\", \"max_length\": 100}
     }
   }

5. AUTHORIZATION (user ownership):
   - Add a user_id foreign key to app_users.id for user-owned resources

   Example:
   {
     \"orders\": {
       \"user_id\": {\"type\": \"uuid\", \"foreign_key\": \"app_users.id\"},
       \"total\": {\"type\": \"decimal\", \"precision\": 10, \"scale\": 2}
     }
   }

6. FIELD OPTIONS:
   - required: true/false
   - unique: true/false
   - default: any value
   - enum: [\"value1\", \"value2\"]
   - foreign_key: \"table_name.id\"

AVAILABLE TYPES: string, text, integer, decimal, boolean, uuid, date, datetime, json";

const COMMON_ERRORS: &str = "\
1. NESTED 'fields' KEY:
   WRONG: {\"users\": {\"fields\": {\"email\": {...}}}}
   RIGHT: {\"users\": {\"email\": {...}}}

2. MISSING TYPE PROPERTY:
   WRONG: {\"name\": {\"required\": true}}
   RIGHT: {\"name\": {\"type\": \"string\", \"max_length\": 100, \"required\": true}}

3. STRING WITHOUT max_length:
   WRONG: {\"email\": {\"type\": \"string\"}}
   RIGHT: {\"email\": {\"type\": \"string\", \"max_length\": 255}}

4. DECIMAL WITHOUT precision/scale:
   WRONG: {\"price\": {\"type\": \"decimal\"}}
   RIGHT: {\"price\": {\"type\": \"decimal\", \"precision\": 10, \"scale\": 2}}

5. USING \"timestamp\" INSTEAD OF \"datetime\":
   WRONG: {\"created\": {\"type\": \"timestamp\"}}
   RIGHT: {\"created\": {\"type\": \"datetime\"}}

6. DEFINING AUTOMATIC FIELDS:
   WRONG: {\"id\": {...}}, {\"created_at\": {...}}, {\"updated_at\": {...}}
   RIGHT: leave them out, they are added automatically

7. CREATING A users/customers/employees TABLE:
   WRONG: {\"users\": {\"email\": {...}, \"password\": {...}}}
   RIGHT: use the app_users pattern with a foreign key";

fn render_create_project(args: &Args<'_>) -> String {
    format!(
        "Create a RationalBloks project schema for: {}\n\n\
         CRITICAL SCHEMA RULES - FOLLOW EXACTLY:\n\n\
         {SCHEMA_RULES}\n\n\
         Generate the schema now following ALL rules above:",
        args.get("description", "")
    )
}

fn render_fix_schema(args: &Args<'_>) -> String {
    format!(
        "Fix this RationalBloks schema:\n\n\
         Schema:\n{}\n\n\
         Error: {}\n\n\
         COMMON SCHEMA ERRORS:\n\n\
         {COMMON_ERRORS}\n\n\
         CHECK ALL THESE ISSUES and provide the corrected schema:",
        args.get("schema", "{}"),
        args.get("error_message", "Unknown error")
    )
}

fn render_scaffold(args: &Args<'_>) -> String {
    format!(
        "Scaffold frontend for \"{}\" at {}.\n\n\
         WORKFLOW:\n\
         1. Get the backend schema using get_schema (if you have project_id)\n\
         2. Or define a schema based on user requirements\n\
         3. Use scaffold_frontend with project_path, app_name, and schema\n\
         4. This will generate all types, API service, views, dashboard, routes, and navbar\n\n\
         The project should already exist (cloned from rationalbloksfront or equivalent).\n\
         Start now:",
        args.get("app_name", "My App"),
        args.get("project_path", "")
    )
}

fn render_fullstack(args: &Args<'_>) -> String {
    let app_name = args.get("app_name", "my-app");
    let description = args.get("description", "");
    let destination = args.get("destination", "~/projects");
    format!(
        "Create a fullstack app called \"{app_name}\" in {destination}.\n\n\
         App description: {description}\n\n\
         Use create_app tool with:\n\
         - name: {app_name}\n\
         - description: {description}\n\
         - destination: {destination}\n\
         - schema: Design based on description\n\n\
         Remember schema must be FLAT format. Start now:"
    )
}

#[cfg(test)]
mod tests {
    use rmcp::model::PromptMessageContent;
    use serde_json::json;

    use super::*;

    fn text(result: &GetPromptResult) -> &str {
        match &result.messages[0].content {
            PromptMessageContent::Text { text } => text,
            _ => panic!("expected a text message"),
        }
    }

    fn names(mode: ServerMode) -> Vec<String> {
        list(mode).into_iter().map(|p| p.name.to_string()).collect()
    }

    #[test]
    fn prompts_follow_mode() {
        assert_eq!(
            names(ServerMode::Backend),
            ["create-project-from-description", "fix-schema-errors"]
        );
        assert_eq!(
            names(ServerMode::Frontend),
            ["scaffold-from-schema", "create-fullstack-app"]
        );
        assert_eq!(names(ServerMode::Full).len(), 4);
    }

    #[test]
    fn arguments_are_described() {
        let prompts = list(ServerMode::Backend);
        let fix = prompts.iter().find(|p| p.name == "fix-schema-errors").unwrap();
        let args = fix.arguments.as_ref().unwrap();
        assert_eq!(args.len(), 2);
        assert_eq!(args[0].required, Some(true));
        assert_eq!(args[1].name, "error_message");
        assert_eq!(args[1].required, Some(false));
        assert_eq!(fix.title.as_deref(), Some("Fix Schema Errors"));
    }

    #[test]
    fn fix_schema_defaults_error_message() {
        let args = json!({ "schema": "{\"users\": {}}" });
        let result = get(ServerMode::Backend, "fix-schema-errors", args.as_object()).unwrap();
        let body = text(&result);
        assert!(body.contains("Schema:\n{\"users\": {}}"));
        assert!(body.contains("Error: Unknown error"));
    }

    #[test]
    fn fullstack_uses_defaults_without_arguments() {
        let result = get(ServerMode::Full, "create-fullstack-app", None).unwrap();
        let body = text(&result);
        assert!(body.starts_with("Create a fullstack app called \"my-app\" in ~/projects."));
    }

    #[test]
    fn scaffold_substitutes_arguments() {
        let args = json!({ "project_path": "/work/app", "app_name": "Todo" });
        let result = get(ServerMode::Frontend, "scaffold-from-schema", args.as_object()).unwrap();
        assert!(text(&result).starts_with("Scaffold frontend for \"Todo\" at /work/app."));
    }

    #[test]
    fn unknown_or_hidden_prompt_is_rejected() {
        let err = get(ServerMode::Full, "nope", None).unwrap_err();
        assert_eq!(err.message, "Unknown prompt: nope");

        let err = get(ServerMode::Backend, "scaffold-from-schema", None).unwrap_err();
        assert_eq!(err.message, "Unknown prompt: scaffold-from-schema");
    }
}
