// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::fmt::Write;

use super::{banner, prop_key};
use crate::schema::{Field, FlatSchema};

fn field_line(out: &mut String, field: &Field) {
    let optional = if field.required { "" } else { "?" };
    let _ = writeln!(
        out,
        "  {}{optional}: {};",
        prop_key(&field.name),
        field.field_type.ts_type()
    );
}

/// Contents of `src/types/generated.ts`.
pub fn render_types(schema: &FlatSchema) -> String {
    let mut out = banner("AUTO-GENERATED TYPES - Do not edit manually");
    out.push('\n');

    for table in &schema.tables {
        let ty = table.type_name();

        let _ = writeln!(out, "export interface {ty} {{");
        out.push_str("  id: string;\n");
        for field in table.declared_fields() {
            field_line(&mut out, field);
        }
        out.push_str("  created_at: string;\n");
        out.push_str("  updated_at: string;\n");
        out.push_str("}\n\n");

        let _ = writeln!(out, "export interface Create{ty}Input {{");
        for field in table.editable_fields() {
            field_line(&mut out, field);
        }
        out.push_str("}\n\n");

        let _ = writeln!(
            out,
            "export type Update{ty}Input = Partial<Create{ty}Input>;\n"
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn entity_create_and_update_types() {
        let schema = FlatSchema::from_value(&json!({
            "tasks": {
                "title": { "type": "string", "required": true },
                "done": { "type": "boolean" },
                "user_id": { "type": "uuid" },
                "meta": { "type": "json" }
            }
        }))
        .unwrap();
        let ts = render_types(&schema);

        assert!(ts.contains("AUTO-GENERATED TYPES - Do not edit manually"));
        assert!(ts.contains(
            "export interface Task {\n  id: string;\n  title: string;\n  done?: boolean;\n  \
             user_id?: string;\n  meta?: Record<string, unknown>;\n  created_at: string;\n  \
             updated_at: string;\n}"
        ));
        assert!(ts.contains(
            "export interface CreateTaskInput {\n  title: string;\n  done?: boolean;\n  \
             meta?: Record<string, unknown>;\n}"
        ));
        assert!(ts.contains("export type UpdateTaskInput = Partial<CreateTaskInput>;"));
    }

    #[test]
    fn enum_fields_keep_their_column_type() {
        let schema = FlatSchema::from_value(&json!({
            "tasks": {
                "status": { "type": "string", "enum": ["todo", "done"], "required": true },
                "priority": { "type": "integer", "enum": [1, 2, 3] }
            }
        }))
        .unwrap();
        let ts = render_types(&schema);
        assert!(ts.contains("  status: string;\n"));
        assert!(ts.contains("  priority?: number;\n"));
    }

    #[test]
    fn system_columns_are_not_duplicated() {
        let schema = FlatSchema::from_value(&json!({
            "notes": { "id": { "type": "uuid" }, "created_at": { "type": "datetime" } }
        }))
        .unwrap();
        let ts = render_types(&schema);
        assert_eq!(ts.matches("  id: string;").count(), 1);
        assert_eq!(ts.matches("created_at").count(), 1);
    }
}
