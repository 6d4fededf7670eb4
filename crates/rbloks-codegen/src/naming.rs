// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Identifier conventions shared by every emitter.
//!
//! Table names are snake_case in the schema (`project_tasks`); generated
//! components use PascalCase (`ProjectTasksView`), entity types use the
//! singular (`ProjectTask`) and routes keep the raw table name.

/// URL- and directory-safe project name: `"My Todo App!"` → `"my-todo-app"`.
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .replace(' ', "-")
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn words(name: &str) -> impl Iterator<Item = &str> {
    name.split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|w| !w.is_empty())
}

pub fn pascal_case(name: &str) -> String {
    words(name).map(capitalize).collect()
}

pub fn camel_case(name: &str) -> String {
    let pascal = pascal_case(name);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Naive English singular: strips one trailing `s`.
pub fn singular(word: &str) -> String {
    match word.strip_suffix('s') {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => word.to_string(),
    }
}

/// Human label: `due_date` → `Due Date`.
pub fn title_case(name: &str) -> String {
    words(name).map(capitalize).collect::<Vec<_>>().join(" ")
}

/// Key used in the generated `ENTITIES` map: `project_tasks` → `PROJECT_TASKS`.
pub fn entity_constant(table: &str) -> String {
    let key: String = table
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
        .collect();
    if key.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{key}")
    } else {
        key
    }
}

/// True when `name` can be used as a bare TypeScript property or identifier.
pub fn is_ts_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
