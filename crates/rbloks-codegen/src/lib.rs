// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Frontend generation for RationalBloks projects.
//!
//! A FLAT schema (`{table: {field: {type, ...}}}`) is rendered into the
//! TypeScript sources of a React app built on the RationalBloks template:
//! entity types, a typed API service, list/form views per table, a
//! dashboard, routes and navigation.  [`pipeline`] strings the individual
//! generators together, optionally provisioning the backend first.

mod error;
pub mod generate;
pub mod naming;
mod npm;
pub mod pipeline;
pub mod project;
pub mod render;
pub mod schema;
pub mod template;

pub use error::CodegenError;
pub use npm::npm_install;
pub use pipeline::{
    scaffold_frontend, AppGenerator, AppRequest, BackendInfo, BackendProvisioner, StepFailure,
    StepReport,
};
pub use project::{configure_api_url, update_package_json, ApiUrlConfigured};
pub use schema::{FieldType, FlatSchema, Table};
pub use template::{clone_template, list_files, template_structure, CloneOutcome};
