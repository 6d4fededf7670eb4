// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Typed view of the platform's flat schema.
//!
//! ```json
//! { "tasks": { "title": { "type": "string", "required": true },
//!              "status": { "type": "string", "enum": ["todo", "done"] } } }
//! ```
//!
//! Table and field order follow the source document; generated files list
//! them in the same order the user wrote them.

use serde_json::{Map, Value};

use crate::error::CodegenError;
use crate::naming::{pascal_case, singular};

/// Columns the platform adds to every table.
pub const SYSTEM_FIELDS: &[&str] = &["id", "created_at", "updated_at"];

/// Owner column filled in by the backend; never edited in forms.
pub const OWNER_FIELD: &str = "user_id";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    String,
    Text,
    Integer,
    Decimal,
    Boolean,
    Uuid,
    Date,
    Datetime,
    Json,
    Other(String),
}

impl FieldType {
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "string" => FieldType::String,
            "text" => FieldType::Text,
            "integer" => FieldType::Integer,
            "decimal" => FieldType::Decimal,
            "boolean" => FieldType::Boolean,
            "uuid" => FieldType::Uuid,
            "date" => FieldType::Date,
            "datetime" => FieldType::Datetime,
            "json" => FieldType::Json,
            _ => FieldType::Other(raw.to_string()),
        }
    }

    /// TypeScript type used in generated interfaces.
    pub fn ts_type(&self) -> &'static str {
        match self {
            FieldType::String
            | FieldType::Text
            | FieldType::Uuid
            | FieldType::Date
            | FieldType::Datetime => "string",
            FieldType::Integer | FieldType::Decimal => "number",
            FieldType::Boolean => "boolean",
            FieldType::Json => "Record<string, unknown>",
            FieldType::Other(_) => "unknown",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Integer | FieldType::Decimal)
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, FieldType::Date | FieldType::Datetime)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub field_type: FieldType,
    pub required: bool,
    /// Allowed values as declared; empty when the field is free-form.
    pub enum_values: Vec<Value>,
    pub default: Option<Value>,
}

impl Field {
    fn from_value(table: &str, name: &str, def: &Value) -> Result<Self, CodegenError> {
        let def = def.as_object().ok_or_else(|| {
            CodegenError::Schema(format!(
                "Field '{table}.{name}' must be an object like {{\"type\": \"string\"}}"
            ))
        })?;
        let field_type = def
            .get("type")
            .and_then(Value::as_str)
            .map(FieldType::parse)
            .unwrap_or(FieldType::String);
        let enum_values = def
            .get("enum")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        Ok(Self {
            name: name.to_string(),
            field_type,
            required: def.get("required").and_then(Value::as_bool).unwrap_or(false),
            enum_values,
            default: def.get("default").cloned(),
        })
    }

    pub fn is_enum(&self) -> bool {
        !self.enum_values.is_empty()
    }

    /// Whether the field appears in create/update inputs and forms.
    pub fn is_editable(&self) -> bool {
        self.name != OWNER_FIELD && !SYSTEM_FIELDS.contains(&self.name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    pub fields: Vec<Field>,
}

impl Table {
    /// Build a table from its field map (`{field: {type, ...}}`).
    pub fn from_fields(name: &str, fields: &Value) -> Result<Self, CodegenError> {
        let map = fields.as_object().ok_or_else(|| {
            CodegenError::Schema(format!("Table '{name}' must map field names to definitions"))
        })?;
        if is_nested_wrapper(map) {
            return Err(CodegenError::Schema(format!(
                "Table '{name}' wraps its columns in a 'fields' object; schema must be FLAT: \
                 {{\"{name}\": {{\"field\": {{\"type\": \"string\"}}}}}}"
            )));
        }
        let fields = map
            .iter()
            .map(|(field, def)| Field::from_value(name, field, def))
            .collect::<Result<_, _>>()?;
        Ok(Self {
            name: name.to_string(),
            fields,
        })
    }

    /// `tasks` → `Tasks`, used for list components and labels.
    pub fn plural_type(&self) -> String {
        pascal_case(&self.name)
    }

    /// `tasks` → `Task`, used for the entity interface and form component.
    pub fn type_name(&self) -> String {
        singular(&self.plural_type())
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields declared by the user, without the platform-managed columns.
    pub fn declared_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields
            .iter()
            .filter(|f| !SYSTEM_FIELDS.contains(&f.name.as_str()))
    }

    pub fn editable_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.is_editable())
    }
}

/// A `fields` key that is not itself a column definition.
fn is_nested_wrapper(map: &Map<String, Value>) -> bool {
    match map.get("fields") {
        Some(Value::Object(inner)) => {
            !inner.contains_key("type") && inner.values().all(Value::is_object)
        }
        _ => false,
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatSchema {
    pub tables: Vec<Table>,
}

impl FlatSchema {
    pub fn from_value(schema: &Value) -> Result<Self, CodegenError> {
        let map = schema.as_object().ok_or_else(|| {
            CodegenError::Schema("Schema must be a JSON object mapping table names to fields".into())
        })?;
        let tables = map
            .iter()
            .map(|(name, fields)| Table::from_fields(name, fields))
            .collect::<Result<_, _>>()?;
        Ok(Self { tables })
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }
}
