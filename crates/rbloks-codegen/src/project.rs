// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! In-place edits of a cloned frontend project: `.env`, `package.json`,
//! template cleanup and the shared file writer used by the generators.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::CodegenError;
use crate::naming::slugify;
use crate::render::API_URL_ENV;

/// Views shipped with the template that belong to the platform console,
/// not to generated apps.
pub const TEMPLATE_ONLY_VIEWS: &[&str] = &[
    "ProjectsView.tsx",
    "ProjectSettingsView.tsx",
    "BillingView.tsx",
    "TemplatesView.tsx",
    "DocumentationViewNew.tsx",
    "JsonSchemaIDE.tsx",
    "PaymentSuccessView.tsx",
    "PaymentCancelView.tsx",
    "SupportView.tsx",
];

pub const VIEWS_DIR: &str = "src/components/views";

/// Fail unless `project` is an existing directory.
pub fn ensure_project(project: &Path) -> Result<(), CodegenError> {
    if project.is_dir() {
        Ok(())
    } else {
        Err(CodegenError::ProjectNotFound(project.display().to_string()))
    }
}

/// Write `contents` to `project/rel`, creating parent directories.
pub fn write_file(project: &Path, rel: &str, contents: &str) -> Result<PathBuf, CodegenError> {
    let path = project.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(CodegenError::io(parent, "creating"))?;
    }
    std::fs::write(&path, contents).map_err(CodegenError::io(&path, "writing"))?;
    debug!(path = %path.display(), bytes = contents.len(), "wrote generated file");
    Ok(path)
}

/// Result of pointing a project at a backend.
#[derive(Debug, Clone, Serialize)]
pub struct ApiUrlConfigured {
    pub success: bool,
    pub env_file: String,
    pub configured: BTreeMap<String, String>,
    pub note: String,
    pub next_steps: Vec<String>,
}

/// Set `VITE_DATABASE_API_URL` in `.env`, seeding it from `.env.example`
/// when missing.  Other lines are left untouched.
pub fn configure_env(project: &Path, api_url: &str) -> Result<PathBuf, CodegenError> {
    ensure_project(project)?;
    let env_file = project.join(".env");
    let example = project.join(".env.example");

    if !env_file.exists() {
        if example.is_file() {
            std::fs::copy(&example, &env_file).map_err(CodegenError::io(&example, "copying"))?;
        } else {
            std::fs::write(&env_file, "").map_err(CodegenError::io(&env_file, "creating"))?;
        }
    }

    let content =
        std::fs::read_to_string(&env_file).map_err(CodegenError::io(&env_file, "reading"))?;
    let prefix = format!("{API_URL_ENV}=");
    let setting = format!("{prefix}{api_url}");

    let mut replaced = false;
    let mut lines: Vec<String> = content
        .lines()
        .map(|line| {
            if line.starts_with(&prefix) {
                replaced = true;
                setting.clone()
            } else {
                line.to_string()
            }
        })
        .collect();
    if !replaced {
        lines.push(setting);
    }

    let mut out = lines.join("\n");
    out.push('\n');
    std::fs::write(&env_file, out).map_err(CodegenError::io(&env_file, "writing"))?;
    Ok(env_file)
}

/// `configure_api_url` tool body: [`configure_env`] plus guidance.
pub fn configure_api_url(project: &Path, api_url: &str) -> Result<ApiUrlConfigured, CodegenError> {
    let env_file = configure_env(project, api_url)?;
    Ok(ApiUrlConfigured {
        success: true,
        env_file: env_file.display().to_string(),
        configured: BTreeMap::from([(API_URL_ENV.to_string(), api_url.to_string())]),
        note: "VITE_BUSINESS_LOGIC_API_URL (platform auth) is pre-configured in the template"
            .into(),
        next_steps: vec![
            "npm install  # Install dependencies".into(),
            "npm run dev  # Start development server".into(),
            format!("# Your frontend will connect to {api_url}"),
        ],
    })
}

/// Rename the template's `package.json` to the app.  Returns `false` when the
/// project has no `package.json`.
pub fn update_package_json(
    project: &Path,
    name: &str,
    description: &str,
) -> Result<bool, CodegenError> {
    let pkg_file = project.join("package.json");
    if !pkg_file.is_file() {
        return Ok(false);
    }
    let text = std::fs::read_to_string(&pkg_file).map_err(CodegenError::io(&pkg_file, "reading"))?;
    let mut pkg: Value = serde_json::from_str(&text).map_err(|source| CodegenError::Json {
        context: pkg_file.display().to_string(),
        source,
    })?;
    let obj = pkg.as_object_mut().ok_or_else(|| CodegenError::Json {
        context: pkg_file.display().to_string(),
        source: serde::de::Error::custom("expected a JSON object"),
    })?;
    obj.insert("name".into(), Value::String(slugify(name)));
    obj.insert("description".into(), Value::String(description.to_string()));
    obj.insert("version".into(), Value::String("1.0.0".into()));

    let mut out = serde_json::to_string_pretty(&pkg).map_err(|source| CodegenError::Json {
        context: pkg_file.display().to_string(),
        source,
    })?;
    out.push('\n');
    std::fs::write(&pkg_file, out).map_err(CodegenError::io(&pkg_file, "writing"))?;
    Ok(true)
}

/// Delete the platform-console views the template ships with.  Returns the
/// file names that were removed.
pub fn cleanup_template_files(project: &Path) -> Result<Vec<String>, CodegenError> {
    let views = project.join(VIEWS_DIR);
    let mut removed = Vec::new();
    for name in TEMPLATE_ONLY_VIEWS {
        let path = views.join(name);
        if path.is_file() {
            std::fs::remove_file(&path).map_err(CodegenError::io(&path, "removing"))?;
            removed.push(name.to_string());
        }
    }
    Ok(removed)
}
