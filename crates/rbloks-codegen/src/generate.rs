// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! File writers for each generator.  Every function checks that the project
//! exists, renders, writes and returns the written paths.

use std::path::{Path, PathBuf};

use rbloks_config::FrontendConfig;

use crate::error::CodegenError;
use crate::project::{ensure_project, write_file, VIEWS_DIR};
use crate::render::{self, Packages};
use crate::schema::{FlatSchema, Table};

pub const TYPES_FILE: &str = "src/types/generated.ts";
pub const API_SERVICE_FILE: &str = "src/services/appApi.ts";
pub const APP_FILE: &str = "src/App.tsx";
pub const NAVBAR_FILE: &str = "src/config/Navbar.tsx";
pub const DASHBOARD_FILE: &str = "src/components/views/DashboardView.tsx";

pub fn generate_types(project: &Path, schema: &FlatSchema) -> Result<PathBuf, CodegenError> {
    ensure_project(project)?;
    write_file(project, TYPES_FILE, &render::render_types(schema))
}

/// Write the API service.  Without `api_url` the configured default is
/// baked in as the fallback; `.env` still takes precedence at runtime.
pub fn generate_api_service(
    project: &Path,
    schema: &FlatSchema,
    api_url: Option<&str>,
    cfg: &FrontendConfig,
) -> Result<PathBuf, CodegenError> {
    ensure_project(project)?;
    let url = api_url.filter(|u| !u.is_empty()).unwrap_or(&cfg.default_api_url);
    write_file(
        project,
        API_SERVICE_FILE,
        &render::render_api_service(schema, url, Packages::from(cfg)),
    )
}

pub fn generate_list_view(project: &Path, table: &Table) -> Result<PathBuf, CodegenError> {
    ensure_project(project)?;
    let rel = format!("{VIEWS_DIR}/{}View.tsx", table.plural_type());
    write_file(project, &rel, &render::render_list_view(table))
}

pub fn generate_form_view(project: &Path, table: &Table) -> Result<PathBuf, CodegenError> {
    ensure_project(project)?;
    let rel = format!("{VIEWS_DIR}/{}FormView.tsx", table.type_name());
    write_file(project, &rel, &render::render_form_view(table))
}

/// List and form view for every table, in schema order.
pub fn generate_all_views(project: &Path, schema: &FlatSchema) -> Result<Vec<PathBuf>, CodegenError> {
    let mut files = Vec::with_capacity(schema.tables.len() * 2);
    for table in &schema.tables {
        files.push(generate_list_view(project, table)?);
        files.push(generate_form_view(project, table)?);
    }
    Ok(files)
}

pub fn generate_dashboard(
    project: &Path,
    app_name: &str,
    schema: &FlatSchema,
) -> Result<PathBuf, CodegenError> {
    ensure_project(project)?;
    write_file(project, DASHBOARD_FILE, &render::render_dashboard(app_name, schema))
}

/// Rewrite `src/App.tsx` with routes for every generated view.
pub fn update_routes(
    project: &Path,
    schema: &FlatSchema,
    cfg: &FrontendConfig,
) -> Result<PathBuf, CodegenError> {
    ensure_project(project)?;
    write_file(project, APP_FILE, &render::render_app(schema, Packages::from(cfg)))
}

pub fn update_navbar(
    project: &Path,
    app_name: &str,
    schema: &FlatSchema,
) -> Result<PathBuf, CodegenError> {
    ensure_project(project)?;
    write_file(project, NAVBAR_FILE, &render::render_navbar(app_name, schema))
}
