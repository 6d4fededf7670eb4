// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::fmt::Write;

use super::{banner, fill, js_string, jsx_text, member, template_text};
use crate::naming::{entity_constant, title_case};
use crate::schema::{Field, FieldType, Table, OWNER_FIELD};

const TEMPLATE: &str = include_str!("../../templates/list_view.tsx");

/// Maximum number of data columns shown in a list table.
pub const MAX_LIST_COLUMNS: usize = 5;

/// Columns shown in the list table: no owner column, no JSON blobs.
pub fn list_columns(table: &Table) -> Vec<&Field> {
    table
        .declared_fields()
        .filter(|f| f.name != OWNER_FIELD && f.field_type != FieldType::Json)
        .take(MAX_LIST_COLUMNS)
        .collect()
}

fn cell(field: &Field) -> String {
    let value = member("item", &field.name);
    if field.is_enum() {
        format!("<Chip label={{{value}}} size=\"small\" />")
    } else if field.field_type == FieldType::Boolean {
        format!("{{{value} ? \"Yes\" : \"No\"}}")
    } else if field.field_type.is_temporal() {
        format!("{{{value} ? new Date({value}).toLocaleDateString() : \"-\"}}")
    } else {
        format!("{{{value}}}")
    }
}

/// Contents of `src/components/views/{Plural}View.tsx`.
pub fn render_list_view(table: &Table) -> String {
    let ty = table.type_name();
    let label = ty.clone();
    let columns = list_columns(table);

    let mut headers = String::new();
    let mut cells = String::new();
    for field in &columns {
        let _ = writeln!(
            headers,
            "              <TableCell>{}</TableCell>",
            jsx_text(&title_case(&field.name))
        );
        let _ = writeln!(cells, "                <TableCell>{}</TableCell>", cell(field));
    }

    let empty = jsx_text(&format!(
        "No {} found. Click \"Add {label}\" to create one.",
        table.name
    ));

    fill(
        TEMPLATE,
        &[
            (
                "BANNER",
                &banner(&format!("{} List View - Do not edit manually", table.plural_type())),
            ),
            ("COMPONENT", &format!("{}View", table.plural_type())),
            ("TYPE", &ty),
            ("ENTITY", &entity_constant(&table.name)),
            ("HEADING", &jsx_text(&title_case(&table.name))),
            ("LABEL", &jsx_text(&label)),
            ("NEW_PATH", &js_string(&format!("/{}/new", table.name))),
            ("ROUTE", &template_text(&format!("/{}", table.name))),
            ("HEADERS", &headers),
            ("CELLS", &cells),
            ("COLSPAN", &(columns.len() + 1).to_string()),
            ("EMPTY", &empty),
        ],
    )
}
