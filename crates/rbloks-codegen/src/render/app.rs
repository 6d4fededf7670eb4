// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use super::{banner, fill, js_string, Packages};
use crate::schema::FlatSchema;

const TEMPLATE: &str = include_str!("../../templates/app.tsx");

/// Platform auth endpoint used when the template's `.env` does not set one.
const DEFAULT_AUTH_URL: &str = "https://logicblok.rationalbloks.com";

/// Contents of `src/App.tsx` with a route set for every table.
pub fn render_app(schema: &FlatSchema, packages: Packages<'_>) -> String {
    let mut imports = vec![
        r#"import DashboardView from "./components/views/DashboardView";"#.to_string(),
    ];
    let mut routes = vec![
        r#"          <Route path="/dashboard" element={<DashboardView />} />"#.to_string(),
    ];

    for table in &schema.tables {
        let list = format!("{}View", table.plural_type());
        let form = format!("{}FormView", table.type_name());
        imports.push(format!(r#"import {list} from "./components/views/{list}";"#));
        imports.push(format!(r#"import {form} from "./components/views/{form}";"#));

        let base = format!("/{}", table.name);
        routes.push(format!(
            "          <Route path={} element={{<{list} />}} />",
            js_string(&base)
        ));
        routes.push(format!(
            "          <Route path={} element={{<{form} />}} />",
            js_string(&format!("{base}/new"))
        ));
        routes.push(format!(
            "          <Route path={} element={{<{form} />}} />",
            js_string(&format!("{base}/:id/edit"))
        ));
    }

    fill(
        TEMPLATE,
        &[
            ("BANNER", &banner("App.tsx - Do not edit manually")),
            ("AUTH_PACKAGE", &js_string(packages.auth)),
            ("AUTH_URL", &js_string(DEFAULT_AUTH_URL)),
            ("IMPORTS", &imports.join("\n")),
            ("ROUTES", &routes.join("\n")),
        ],
    )
}
