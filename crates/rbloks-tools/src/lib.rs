// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! The RationalBloks tool set: 18 gateway wrappers and 14 frontend
//! generators behind one [`Tool`] trait, collected per server mode by
//! [`build_registry`].

mod args;
pub mod backend;
pub mod frontend;
mod registry;
mod tool;

pub use args::ToolError;
pub use registry::{build_registry, ToolRegistry, ToolSchema};
pub use tool::{Tool, ToolCall, ToolHints, ToolOutput, BACKEND_MODES, FRONTEND_MODES};

use std::sync::Arc;

use rbloks_client::ClientPool;
use rbloks_config::FrontendConfig;

/// Shared state handed to every tool at registration time.
#[derive(Clone, Default)]
pub struct ToolContext {
    pub pool: Arc<ClientPool>,
    pub frontend: Arc<FrontendConfig>,
}

impl ToolContext {
    pub fn new(pool: Arc<ClientPool>, frontend: FrontendConfig) -> Self {
        Self {
            pool,
            frontend: Arc::new(frontend),
        }
    }
}
