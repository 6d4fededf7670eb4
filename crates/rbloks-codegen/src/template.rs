// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! The React starter template: cloning it and describing its layout.

use std::path::Path;
use std::time::Duration;

use rbloks_config::FrontendConfig;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::error::CodegenError;

/// Cap on entries reported back from a fresh clone.
const MAX_LISTED_FILES: usize = 50;

#[derive(Debug, Clone, Serialize)]
pub struct CloneOutcome {
    pub success: bool,
    pub project_path: String,
    pub template_version: String,
    pub next_steps: Vec<String>,
    pub files_created: Vec<String>,
}

/// Shallow-clone the template into `destination/project_name`, drop its git
/// history and start a fresh repository.
pub async fn clone_template(
    destination: &Path,
    project_name: &str,
    cfg: &FrontendConfig,
) -> Result<CloneOutcome, CodegenError> {
    let project = destination.join(project_name);
    if project.exists() {
        return Err(CodegenError::AlreadyExists(project.display().to_string()));
    }
    std::fs::create_dir_all(destination).map_err(CodegenError::io(destination, "creating"))?;

    info!(repo = %cfg.template_repo, path = %project.display(), "cloning template");
    let mut cmd = Command::new("git");
    cmd.args(["clone", "--depth", "1", "--branch", &cfg.template_branch, &cfg.template_repo])
        .arg(&project)
        .kill_on_drop(true);
    let clone = cmd.output();

    let failure = match tokio::time::timeout(Duration::from_secs(cfg.clone_timeout_secs), clone).await {
        Ok(Ok(output)) if output.status.success() => None,
        Ok(Ok(output)) => Some(CodegenError::CloneFailed(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        )),
        Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => Some(CodegenError::GitMissing),
        Ok(Err(e)) => Some(CodegenError::io(&project, "cloning into")(e)),
        Err(_) => Some(CodegenError::CloneTimeout(cfg.clone_timeout_secs)),
    };
    if let Some(err) = failure {
        discard_partial_clone(&project);
        return Err(err);
    }

    let git_dir = project.join(".git");
    if git_dir.exists() {
        std::fs::remove_dir_all(&git_dir).map_err(CodegenError::io(&git_dir, "removing"))?;
    }
    // A fresh history is a convenience; the project is usable without it.
    if let Err(e) = Command::new("git").arg("init").current_dir(&project).output().await {
        debug!(error = %e, "git init failed");
    }

    Ok(CloneOutcome {
        success: true,
        project_path: project.display().to_string(),
        template_version: cfg.template_branch.clone(),
        next_steps: vec![
            format!("cd {}", project.display()),
            "npm install".into(),
            "npm run dev".into(),
        ],
        files_created: list_files(&project),
    })
}

/// Remove whatever a failed clone left behind so the next attempt starts clean.
fn discard_partial_clone(project: &Path) {
    if project.exists() {
        if let Err(e) = std::fs::remove_dir_all(project) {
            warn!(path = %project.display(), error = %e, "could not remove partial clone");
        }
    }
}

/// Indented listing of a directory tree, dotfiles skipped, directories
/// suffixed with `/`, capped at 50 entries.
pub fn list_files(root: &Path) -> Vec<String> {
    walkdir::WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !e.file_name().to_string_lossy().starts_with('.'))
        .filter_map(Result::ok)
        .take(MAX_LISTED_FILES)
        .map(|e| {
            let indent = "  ".repeat(e.depth() - 1);
            let name = e.file_name().to_string_lossy();
            if e.file_type().is_dir() {
                format!("{indent}{name}/")
            } else {
                format!("{indent}{name}")
            }
        })
        .collect()
}

fn template_layout(cfg: &FrontendConfig) -> Value {
    json!({
        "src/": {
            "components/": {
                "shared/": "Reusable UI components (Navbar, ErrorBoundary, etc.)",
                "views/": "Page components (HomeView, generated entity views)"
            },
            "config/": "App configuration (Navbar config, routes)",
            "contexts/": "React contexts (Auth, Theme)",
            "services/": "API client setup (appApi.ts)",
            "styles/": "Global CSS styles",
            "theme/": "MUI theme configuration",
            "types/": "Generated TypeScript types",
            "App.tsx": "Main routes and providers",
            "main.tsx": "Entry point"
        },
        "public/": "Static assets (favicon, logo)",
        "package.json": format!("Dependencies - includes {} and {}", cfg.auth_package, cfg.crud_package),
        "vite.config.ts": "Vite build configuration",
        "tsconfig.json": "TypeScript configuration",
        ".env.example": "Environment variables template"
    })
}

/// Keep `depth` levels of a layout tree; deeper directories collapse to a
/// count of their entries.
fn prune(node: &Value, depth: usize) -> Value {
    match node {
        Value::Object(children) if depth == 0 => {
            Value::String(format!("({} entries)", children.len()))
        }
        Value::Object(children) => Value::Object(
            children
                .iter()
                .map(|(k, v)| (k.clone(), prune(v, depth - 1)))
                .collect::<Map<_, _>>(),
        ),
        leaf => leaf.clone(),
    }
}

/// Look up `path` (e.g. `src/components`) in the layout tree.
fn subtree<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .try_fold(root, |node, segment| {
            let obj = node.as_object()?;
            obj.get(&format!("{segment}/")).or_else(|| obj.get(segment))
        })
}

/// Static description of the template: directory layout, key files and npm
/// dependencies.  `path` narrows the layout to a subtree, `max_depth` limits
/// how many levels are expanded.
pub fn template_structure(
    path: &str,
    max_depth: usize,
    cfg: &FrontendConfig,
) -> Result<Value, CodegenError> {
    let layout = template_layout(cfg);
    let node = subtree(&layout, path)
        .ok_or_else(|| CodegenError::UnknownTemplatePath(path.to_string()))?;
    let shown = if path.is_empty() { "/" } else { path };

    Ok(json!({
        "template": "rationalbloksfront",
        "repository": cfg.template_repo,
        "version": cfg.template_branch,
        "path": shown,
        "structure": prune(node, max_depth.max(1)),
        "key_files": [
            { "path": "src/services/appApi.ts", "purpose": "createAuthApi + initApi; exports ENTITIES and getApi" },
            { "path": ".env.example", "purpose": "Environment variables (VITE_DATABASE_API_URL, etc.)" },
            { "path": "src/App.tsx", "purpose": "Main application routes" },
            { "path": "src/config/Navbar.tsx", "purpose": "APP_NAME and NAV_ITEMS" },
            { "path": "src/theme/createAppTheme.ts", "purpose": "MUI theme customization" }
        ],
        "dependencies": {
            (cfg.auth_package.clone()): "Core mechanics (auth, tokens, app provider)",
            (cfg.crud_package.clone()): "Generic CRUD client (initApi, getApi)",
            "@mui/material": "UI component library",
            "react-router-dom": "Client-side routing",
            "@react-oauth/google": "Google OAuth integration"
        }
    }))
}
