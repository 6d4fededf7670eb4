// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::fmt::Write;

use super::{banner, fill, js_string, jsx_text};
use crate::naming::{camel_case, entity_constant, title_case};
use crate::schema::FlatSchema;

const TEMPLATE: &str = include_str!("../../templates/dashboard.tsx");

/// Contents of `src/components/views/DashboardView.tsx`: one count card per
/// table, all counts fetched in parallel.
pub fn render_dashboard(app_name: &str, schema: &FlatSchema) -> String {
    let mut stats_fields = String::new();
    let mut stats_zero = String::new();
    let mut stats_set = String::new();
    let mut fetches = String::new();
    let mut results = Vec::new();
    let mut cards = String::new();

    for table in &schema.tables {
        let base = camel_case(&table.name);
        let count = format!("{base}Count");
        let data = format!("{base}Data");

        let _ = writeln!(stats_fields, "  {count}: number;");
        let _ = writeln!(stats_zero, "    {count}: 0,");
        let _ = writeln!(stats_set, "        {count}: {data}?.length || 0,");
        let _ = writeln!(
            fetches,
            "        getApi().getAll(ENTITIES.{}),",
            entity_constant(&table.name)
        );
        results.push(data);

        let _ = write!(
            cards,
            r#"        <Grid item xs={{12}} sm={{6}} md={{4}}>
          <Paper
            sx={{{{
              p: 3,
              cursor: "pointer",
              transition: "transform 0.2s",
              "&:hover": {{ transform: "scale(1.02)" }},
            }}}}
            onClick={{() => navigate({path})}}
          >
            <Typography variant="h6" color="text.secondary" gutterBottom>
              {label}
            </Typography>
            <Typography variant="h3" fontWeight="bold">
              {{stats.{count}}}
            </Typography>
          </Paper>
        </Grid>

"#,
            path = js_string(&format!("/{}", table.name)),
            label = jsx_text(&title_case(&table.name)),
        );
    }

    fill(
        TEMPLATE,
        &[
            ("BANNER", &banner("Dashboard View - Do not edit manually")),
            ("STATS_FIELDS", &stats_fields),
            ("STATS_ZERO", &stats_zero),
            ("STATS_SET", &stats_set),
            ("FETCHES", &fetches),
            ("RESULTS", &results.join(", ")),
            ("CARDS", &cards),
            ("HEADING", &jsx_text(&format!("{app_name} Dashboard"))),
        ],
    )
}
