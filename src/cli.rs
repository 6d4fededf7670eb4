// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use rbloks_config::{Config, ServerMode, Transport};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "rationalbloks-mcp",
    about = "MCP server for building RationalBloks backends and frontends",
    version,
    long_about = None,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// RationalBloks API key (rb_sk_...).  Required for stdio; HTTP callers
    /// send their own key as a Bearer token.
    #[arg(long, env = "RATIONALBLOKS_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Tool families to expose
    #[arg(long, short = 'm', value_enum, ignore_case = true, env = "RATIONALBLOKS_MODE", global = true)]
    pub mode: Option<ServerMode>,

    /// stdio for local IDEs, http for hosted deployments
    #[arg(long, short = 't', value_enum, ignore_case = true, env = "TRANSPORT")]
    pub transport: Option<Transport>,

    /// HTTP bind address
    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    /// HTTP port
    #[arg(long, short = 'p', env = "PORT")]
    pub port: Option<u16>,

    /// Base URL of the LogicBlok gateway
    #[arg(long, env = "RATIONALBLOKS_GATEWAY_URL", global = true)]
    pub gateway_url: Option<String>,

    /// Comma-separated tool names to expose (default: all tools of the mode)
    #[arg(long, value_name = "NAMES", global = true)]
    pub tools: Option<String>,

    /// Path to config file (overrides auto-discovery)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v = debug, -vv = trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the MCP server (the default when no subcommand is given)
    Serve,
    /// List the tools exposed in the selected mode
    ListTools {
        /// Output as JSON instead of a formatted table
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration and exit
    ShowConfig,
    /// Query the gateway health endpoint
    Health,
    /// Generate shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Layer command-line and environment overrides on top of the loaded
    /// config files.
    pub fn apply(&self, config: &mut Config) {
        if let Some(key) = self.api_key.as_ref().filter(|k| !k.is_empty()) {
            config.gateway.api_key = Some(key.clone());
        }
        if let Some(mode) = self.mode {
            config.server.mode = mode;
        }
        if let Some(transport) = self.transport {
            config.server.transport = transport;
        }
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(url) = &self.gateway_url {
            config.gateway.base_url = url.clone();
        }
        if let Some(tools) = &self.tools {
            config.server.tools = Some(tools.clone());
        }
    }
}

pub fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "rationalbloks-mcp", &mut std::io::stdout());
}
