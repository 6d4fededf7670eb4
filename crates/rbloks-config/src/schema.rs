// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub frontend: FrontendConfig,
}

// ─── Server ──────────────────────────────────────────────────────────────────

/// Which tool families the server exposes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ServerMode {
    /// Project, schema and deployment tools only
    Backend,
    /// Frontend generation tools only
    Frontend,
    /// Both tool families
    #[default]
    Full,
}

impl ServerMode {
    /// True when tools written for `family` are visible in this mode.
    pub fn includes(self, family: ServerMode) -> bool {
        self == ServerMode::Full || family == ServerMode::Full || self == family
    }
}

impl std::fmt::Display for ServerMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServerMode::Backend => write!(f, "backend"),
            ServerMode::Frontend => write!(f, "frontend"),
            ServerMode::Full => write!(f, "full"),
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// Line-delimited JSON-RPC over stdin/stdout
    #[default]
    Stdio,
    /// Streamable HTTP with per-request Bearer authentication
    Http,
}

impl std::fmt::Display for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Transport::Stdio => write!(f, "stdio"),
            Transport::Http => write!(f, "http"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub mode: ServerMode,
    pub transport: Transport,
    /// Bind address for the HTTP transport
    pub host: String,
    pub port: u16,
    /// Comma-separated tool names to expose, or "all".
    pub tools: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            mode: ServerMode::Full,
            transport: Transport::Stdio,
            host: "0.0.0.0".into(),
            port: 8000,
            tools: None,
        }
    }
}

// ─── Gateway ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub base_url: String,
    /// Environment variable that holds the API key (read at runtime)
    pub api_key_env: String,
    /// Explicit API key; prefer api_key_env in config files to avoid secrets
    /// in version-controlled files
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    /// Attempts per request for connection errors, timeouts and HTTP 503
    pub max_retries: u32,
    /// First backoff delay; doubled on every further attempt
    pub retry_base_delay_ms: u64,
    pub user_agent: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "https://logicblok.rationalbloks.com".into(),
            api_key_env: "RATIONALBLOKS_API_KEY".into(),
            api_key: None,
            timeout_secs: 30,
            max_retries: 3,
            retry_base_delay_ms: 1000,
            user_agent: None,
        }
    }
}

impl GatewayConfig {
    /// Explicit key first, then the configured environment variable.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|k| !k.is_empty())
    }
}

// ─── Frontend generation ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontendConfig {
    /// Git repository cloned by `clone_template` and `create_app`
    pub template_repo: String,
    pub template_branch: String,
    pub clone_timeout_secs: u64,
    pub npm_install_timeout_secs: u64,
    /// npm package providing `createAuthApi` and `createAppProvider`
    pub auth_package: String,
    /// npm package providing `initApi` and `getApi`
    pub crud_package: String,
    /// API URL baked into generated services when none is given
    pub default_api_url: String,
    pub deploy_poll_interval_secs: u64,
    pub deploy_timeout_secs: u64,
    pub dev_server_url: String,
    /// Staging URL used when the gateway does not report one.
    /// `{project_code}` is substituted.
    pub staging_url_template: String,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            template_repo: "https://github.com/velosovictor/rationalbloksfront.git".into(),
            template_branch: "main".into(),
            clone_timeout_secs: 120,
            npm_install_timeout_secs: 300,
            auth_package: "@rationalbloks/universalfront".into(),
            crud_package: "@rationalbloks/frontbuilderblok".into(),
            default_api_url: "http://localhost:8000".into(),
            deploy_poll_interval_secs: 5,
            deploy_timeout_secs: 300,
            dev_server_url: "http://localhost:5173".into(),
            staging_url_template:
                "https://{project_code}-staging.customersblok.rationalbloks.com".into(),
        }
    }
}
