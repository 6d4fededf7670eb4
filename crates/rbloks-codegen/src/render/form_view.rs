// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::fmt::Write;

use serde_json::Value;

use super::{banner, fill, js_string, jsx_text, member, prop_key};
use crate::naming::{entity_constant, title_case};
use crate::schema::{Field, FieldType, Table};

const TEMPLATE: &str = include_str!("../../templates/form_view.tsx");

/// TS literal for a field's initial form value.
pub fn initial_value(field: &Field) -> String {
    if let Some(default) = &field.default {
        return match default {
            Value::String(s) => js_string(s),
            other => other.to_string(),
        };
    }
    match field.field_type {
        FieldType::Boolean => "false".into(),
        FieldType::Integer | FieldType::Decimal => "0".into(),
        FieldType::Json => "{}".into(),
        _ => "\"\"".into(),
    }
}

/// One MUI input, indented for the form body.
fn widget(field: &Field) -> String {
    let key = js_string(&field.name);
    let label = js_string(&title_case(&field.name));
    let value = member("formData", &field.name);
    let required = if field.required { "\n              required" } else { "" };
    let mut out = String::new();

    if field.is_enum() {
        let req = if field.required { " required" } else { "" };
        let _ = writeln!(out, "            <FormControl fullWidth{req}>");
        let _ = writeln!(out, "              <InputLabel>{}</InputLabel>", jsx_text(&title_case(&field.name)));
        let _ = writeln!(out, "              <Select");
        let _ = writeln!(out, "                value={{{value} ?? \"\"}}");
        let _ = writeln!(out, "                label={label}");
        let change = if field.field_type.is_numeric() {
            "Number(e.target.value)"
        } else {
            "e.target.value"
        };
        let _ = writeln!(out, "                onChange={{(e) => handleChange({key}, {change})}}");
        let _ = writeln!(out, "              >");
        for v in &field.enum_values {
            let (attr, text) = match v {
                Value::String(s) => (js_string(s), s.clone()),
                other => (format!("{{{other}}}"), other.to_string()),
            };
            let _ = writeln!(
                out,
                "                <MenuItem value={attr}>{}</MenuItem>",
                jsx_text(&title_case(&text))
            );
        }
        out.push_str("              </Select>\n");
        out.push_str("            </FormControl>\n");
        return out;
    }

    match &field.field_type {
        FieldType::Boolean => {
            out.push_str("            <FormControlLabel\n");
            out.push_str("              control={\n");
            out.push_str("                <Switch\n");
            let _ = writeln!(out, "                  checked={{Boolean({value})}}");
            let _ = writeln!(out, "                  onChange={{(e) => handleChange({key}, e.target.checked)}}");
            out.push_str("                />\n");
            out.push_str("              }\n");
            let _ = writeln!(out, "              label={label}");
            out.push_str("            />\n");
        }
        FieldType::Text => {
            out.push_str("            <TextField\n");
            let _ = writeln!(out, "              label={label}");
            let _ = writeln!(out, "              value={{{value} ?? \"\"}}");
            let _ = writeln!(out, "              onChange={{(e) => handleChange({key}, e.target.value)}}");
            out.push_str("              multiline\n");
            out.push_str("              rows={4}\n");
            let _ = writeln!(out, "              fullWidth{required}");
            out.push_str("            />\n");
        }
        t if t.is_temporal() => {
            let input = if *t == FieldType::Datetime { "datetime-local" } else { "date" };
            out.push_str("            <TextField\n");
            let _ = writeln!(out, "              label={label}");
            let _ = writeln!(out, "              type=\"{input}\"");
            let _ = writeln!(out, "              value={{{value} ?? \"\"}}");
            let _ = writeln!(out, "              onChange={{(e) => handleChange({key}, e.target.value)}}");
            out.push_str("              InputLabelProps={{ shrink: true }}\n");
            let _ = writeln!(out, "              fullWidth{required}");
            out.push_str("            />\n");
        }
        t if t.is_numeric() => {
            let parse = if *t == FieldType::Decimal { "parseFloat" } else { "parseInt" };
            out.push_str("            <TextField\n");
            let _ = writeln!(out, "              label={label}");
            out.push_str("              type=\"number\"\n");
            let _ = writeln!(out, "              value={{{value} ?? \"\"}}");
            let _ = writeln!(
                out,
                "              onChange={{(e) => handleChange({key}, {parse}(e.target.value) || 0)}}"
            );
            let _ = writeln!(out, "              fullWidth{required}");
            out.push_str("            />\n");
        }
        _ => {
            out.push_str("            <TextField\n");
            let _ = writeln!(out, "              label={label}");
            let _ = writeln!(out, "              value={{{value} ?? \"\"}}");
            let _ = writeln!(out, "              onChange={{(e) => handleChange({key}, e.target.value)}}");
            let _ = writeln!(out, "              fullWidth{required}");
            out.push_str("            />\n");
        }
    }
    out
}

/// Contents of `src/components/views/{Type}FormView.tsx`.
pub fn render_form_view(table: &Table) -> String {
    let ty = table.type_name();
    let fields: Vec<&Field> = table.editable_fields().collect();

    let mut initial = String::new();
    let mut loaded = String::new();
    let mut inputs = String::new();
    for field in &fields {
        let key = prop_key(&field.name);
        let _ = writeln!(initial, "    {key}: {},", initial_value(field));
        let _ = writeln!(loaded, "        {key}: {},", member("data", &field.name));
        inputs.push_str(&widget(field));
        inputs.push('\n');
    }

    fill(
        TEMPLATE,
        &[
            ("BANNER", &banner(&format!("{ty} Form View - Do not edit manually"))),
            ("TYPE", &ty),
            ("ENTITY", &entity_constant(&table.name)),
            ("LABEL", &jsx_text(&ty)),
            ("LIST_PATH", &js_string(&format!("/{}", table.name))),
            ("INITIAL", &initial),
            ("LOADED", &loaded),
            ("FIELDS", &inputs),
        ],
    )
}
