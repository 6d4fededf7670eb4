// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
mod cli;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use rbloks_client::{validate_api_key, ApiKeyError, ClientPool, GatewaySettings, LogicBlokClient};
use rbloks_config::{Config, Transport};
use rbloks_mcp::{ApiKeySource, HttpOptions, RationalBloksServer};
use rbloks_tools::{build_registry, ToolContext, ToolRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    if let Some(Commands::Completions { shell }) = &cli.command {
        cli::print_completions(*shell);
        return Ok(());
    }

    let mut config = rbloks_config::load(cli.config.as_deref())?;
    cli.apply(&mut config);

    match &cli.command {
        Some(Commands::ShowConfig) => {
            println!("{}", serde_yaml::to_string(&config).unwrap_or_default());
            Ok(())
        }
        Some(Commands::ListTools { json }) => list_tools_cmd(&config, *json),
        Some(Commands::Health) => health_cmd(&config).await,
        Some(Commands::Serve) | None => serve(config).await,
        Some(Commands::Completions { .. }) => Ok(()),
    }
}

fn registry_for(config: &Config) -> ToolRegistry {
    let ctx = ToolContext::new(
        Arc::new(ClientPool::new(GatewaySettings::from(&config.gateway))),
        config.frontend.clone(),
    );
    build_registry(config.server.mode, &ctx, config.server.tools.as_deref())
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let keys = match config.server.transport {
        Transport::Http => ApiKeySource::PerRequest,
        Transport::Stdio => ApiKeySource::Fixed(startup_key(&config)),
    };

    let registry = registry_for(&config);
    info!(
        mode = %config.server.mode,
        transport = %config.server.transport,
        tools = registry.len(),
        "starting RationalBloks MCP server"
    );
    let server = RationalBloksServer::new(Arc::new(registry), config.server.mode, keys);

    match config.server.transport {
        Transport::Stdio => rbloks_mcp::serve_stdio(server).await,
        Transport::Http => {
            let opts = HttpOptions {
                host: config.server.host.clone(),
                port: config.server.port,
            };
            rbloks_mcp::serve_http(server, opts).await
        }
    }
}

/// Stdio has no per-request credentials, so the key must be valid before
/// the server starts.  Exits the process otherwise.
fn startup_key(config: &Config) -> String {
    let key = config.gateway.resolve_api_key();
    match validate_api_key(key.as_deref()) {
        Ok(k) => k.to_string(),
        Err(ApiKeyError::Missing) => {
            eprintln!(
                "ERROR: {} environment variable not set\n\n\
                 Get your API key from: https://rationalbloks.com/settings\n\n\
                 Then set it:\n  export {}=rb_sk_your_key_here",
                config.gateway.api_key_env, config.gateway.api_key_env
            );
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("ERROR: {e}");
            std::process::exit(1);
        }
    }
}

fn list_tools_cmd(config: &Config, as_json: bool) -> anyhow::Result<()> {
    let schemas = registry_for(config).schemas();

    if as_json {
        let tools: Vec<serde_json::Value> = schemas
            .iter()
            .map(|s| {
                serde_json::json!({
                    "name": s.name,
                    "title": s.title,
                    "readOnly": s.hints.read_only,
                    "destructive": s.hints.destructive,
                    "inputSchema": s.parameters,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&tools)?);
        return Ok(());
    }

    println!("{} tools ({} mode)\n", schemas.len(), config.server.mode);
    for s in &schemas {
        let flag = if s.hints.destructive {
            "destructive"
        } else if s.hints.read_only {
            "read-only"
        } else {
            ""
        };
        println!("  {:26} {:28} {}", s.name, s.title, flag);
    }
    Ok(())
}

async fn health_cmd(config: &Config) -> anyhow::Result<()> {
    let settings = GatewaySettings::from(&config.gateway);
    let key = config.gateway.resolve_api_key().unwrap_or_default();
    let client = LogicBlokClient::new(&key, &settings)
        .with_context(|| format!("invalid gateway URL {}", settings.base_url))?;
    let status = client.health().await;
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout carries the stdio transport; logs must go to stderr
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
