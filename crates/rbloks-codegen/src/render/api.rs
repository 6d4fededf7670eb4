// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::fmt::Write;

use super::{banner, js_string, Packages, API_URL_ENV};
use crate::naming::entity_constant;
use crate::schema::FlatSchema;

/// Contents of `src/services/appApi.ts`.
///
/// Every view talks to the backend through the generic `getApi()` client
/// and the `ENTITIES` constants emitted here; no per-entity API classes.
pub fn render_api_service(schema: &FlatSchema, api_url: &str, packages: Packages<'_>) -> String {
    let mut out = banner("AUTO-GENERATED API SERVICE - Do not edit manually");
    out.push('\n');
    let _ = writeln!(out, "import {{ createAuthApi }} from {};", js_string(packages.auth));
    let _ = writeln!(out, "import {{ initApi, getApi }} from {};", js_string(packages.crud));
    out.push('\n');
    let _ = writeln!(
        out,
        "const API_URL = import.meta.env.{API_URL_ENV} || {};",
        js_string(api_url)
    );
    out.push('\n');
    out.push_str("const authApi = createAuthApi(API_URL);\n");
    out.push_str("initApi(authApi);\n\n");

    out.push_str("export const ENTITIES = {\n");
    for table in &schema.tables {
        let _ = writeln!(
            out,
            "  {}: {},",
            entity_constant(&table.name),
            js_string(&table.name)
        );
    }
    out.push_str("} as const;\n\n");
    out.push_str("export type EntityName = (typeof ENTITIES)[keyof typeof ENTITIES];\n\n");
    out.push_str("export { authApi, getApi };\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn uses_configured_packages_and_url() {
        let schema = FlatSchema::from_value(&json!({
            "tasks": {}, "project_members": {}
        }))
        .unwrap();
        let ts = render_api_service(
            &schema,
            "https://abc-staging.example.com",
            Packages {
                auth: "@rationalbloks/universalfront",
                crud: "@rationalbloks/frontbuilderblok",
            },
        );
        assert!(ts.contains(r#"import { createAuthApi } from "@rationalbloks/universalfront";"#));
        assert!(ts.contains(r#"import { initApi, getApi } from "@rationalbloks/frontbuilderblok";"#));
        assert!(ts.contains(
            r#"const API_URL = import.meta.env.VITE_DATABASE_API_URL || "https://abc-staging.example.com";"#
        ));
        assert!(ts.contains("initApi(authApi);"));
        assert!(ts.contains("  TASKS: \"tasks\",\n  PROJECT_MEMBERS: \"project_members\",\n} as const;"));
        assert!(ts.contains("export { authApi, getApi };"));
    }
}
