// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Pure source emitters: schema in, file contents out.  Nothing here touches
//! the filesystem; see [`crate::generate`] for the writers.

mod api;
mod app;
mod dashboard;
mod form_view;
mod list_view;
mod navbar;
mod types;

pub use api::render_api_service;
pub use app::render_app;
pub use dashboard::render_dashboard;
pub use form_view::render_form_view;
pub use list_view::render_list_view;
pub use navbar::render_navbar;
pub use types::render_types;

use crate::naming::is_ts_identifier;

/// `import.meta.env` key read by the generated API service.
pub const API_URL_ENV: &str = "VITE_DATABASE_API_URL";

/// Names of the npm packages the generated code imports.
#[derive(Debug, Clone, Copy)]
pub struct Packages<'a> {
    /// Provides `createAuthApi` and `createAppProvider`.
    pub auth: &'a str,
    /// Provides `initApi` and `getApi`.
    pub crud: &'a str,
}

impl<'a> From<&'a rbloks_config::FrontendConfig> for Packages<'a> {
    fn from(cfg: &'a rbloks_config::FrontendConfig) -> Self {
        Self {
            auth: &cfg.auth_package,
            crud: &cfg.crud_package,
        }
    }
}

pub(crate) fn banner(title: &str) -> String {
    format!(
        "// ============================================================================\n\
         // {title}\n\
         // Generated by rationalbloks-mcp\n\
         // ============================================================================\n"
    )
}

/// Double-quoted JS/TS string literal.
pub(crate) fn js_string(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

/// Property key in an object literal or interface body.
pub(crate) fn prop_key(name: &str) -> String {
    if is_ts_identifier(name) {
        name.to_string()
    } else {
        js_string(name)
    }
}

/// `obj.name`, or `obj["name"]` when `name` is not an identifier.
pub(crate) fn member(obj: &str, name: &str) -> String {
    if is_ts_identifier(name) {
        format!("{obj}.{name}")
    } else {
        format!("{obj}[{}]", js_string(name))
    }
}

/// Substitute `@@KEY@@` placeholders in an embedded template.
pub(crate) fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    vars.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(&format!("@@{key}@@"), value)
    })
}

/// Literal text inside a JS template string (between backticks).
pub(crate) fn template_text(s: &str) -> String {
    s.replace('\\', "\\\\").replace('`', "\\`").replace('$', "\\$")
}

/// Text placed between JSX tags; braces and angle brackets are escaped.
pub(crate) fn jsx_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '{' | '}' | '<' | '>' => {
                out.push_str("{");
                out.push_str(&js_string(&c.to_string()));
                out.push('}');
            }
            _ => out.push(c),
        }
    }
    out
}
