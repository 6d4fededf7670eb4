// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use serde::Serialize;

use super::{banner, js_string};
use crate::naming::pascal_case;
use crate::schema::FlatSchema;

#[derive(Debug, Serialize)]
struct NavItem {
    label: String,
    path: String,
}

/// Contents of `src/config/Navbar.tsx`: app name plus Dashboard and one
/// entry per table.
pub fn render_navbar(app_name: &str, schema: &FlatSchema) -> String {
    let mut items = vec![NavItem {
        label: "Dashboard".into(),
        path: "/dashboard".into(),
    }];
    items.extend(schema.tables.iter().map(|t| NavItem {
        label: pascal_case(&t.name),
        path: format!("/{}", t.name),
    }));
    let items_json = serde_json::to_string_pretty(&items).unwrap_or_else(|_| "[]".into());

    format!(
        "{}\nexport const APP_NAME = {};\n\n\
         export interface NavItem {{\n  label: string;\n  path: string;\n}}\n\n\
         export const NAV_ITEMS: NavItem[] = {items_json};\n",
        banner("Navbar Configuration - Do not edit manually"),
        js_string(app_name),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dashboard_first_then_tables() {
        let schema = FlatSchema::from_value(&json!({ "tasks": {}, "team_members": {} })).unwrap();
        let tsx = render_navbar("Task \"Pro\"", &schema);
        assert!(tsx.contains(r#"export const APP_NAME = "Task \"Pro\"";"#));
        assert!(tsx.contains(
            "export const NAV_ITEMS: NavItem[] = [\n  {\n    \"label\": \"Dashboard\",\n    \"path\": \"/dashboard\"\n  },"
        ));
        assert!(tsx.contains("\"label\": \"TeamMembers\",\n    \"path\": \"/team_members\""));
    }
}
