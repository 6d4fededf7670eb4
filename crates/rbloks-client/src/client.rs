// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::time::Duration;

use rbloks_config::GatewayConfig;
use reqwest::{Method, Url};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::error::ClientError;

/// Connection parameters shared by every client built from one config.
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub base_url: String,
    pub timeout: Duration,
    pub max_retries: u32,
    pub retry_base_delay: Duration,
    pub user_agent: String,
}

impl From<&GatewayConfig> for GatewaySettings {
    fn from(cfg: &GatewayConfig) -> Self {
        Self {
            base_url: cfg.base_url.clone(),
            timeout: Duration::from_secs(cfg.timeout_secs),
            max_retries: cfg.max_retries,
            retry_base_delay: Duration::from_millis(cfg.retry_base_delay_ms),
            user_agent: cfg
                .user_agent
                .clone()
                .unwrap_or_else(|| format!("rationalbloks-mcp/{}", env!("CARGO_PKG_VERSION"))),
        }
    }
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self::from(&GatewayConfig::default())
    }
}

/// One authenticated session against the LogicBlok gateway.
pub struct LogicBlokClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
    max_retries: u32,
    retry_base_delay: Duration,
}

impl std::fmt::Debug for LogicBlokClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogicBlokClient")
            .field("base_url", &self.base_url.as_str())
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

impl LogicBlokClient {
    pub fn new(api_key: &str, settings: &GatewaySettings) -> Result<Self, ClientError> {
        let base_url = Url::parse(&settings.base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {e}", settings.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(settings.base_url.clone()));
        }
        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .user_agent(settings.user_agent.clone())
            .build()?;
        Ok(Self {
            http,
            base_url,
            api_key: api_key.to_string(),
            max_retries: settings.max_retries.max(1),
            retry_base_delay: settings.retry_base_delay,
        })
    }

    // ── Read operations ──────────────────────────────────────────────────────

    pub async fn list_projects(&self) -> Result<Value, ClientError> {
        self.get(&["mcp", "projects"]).await
    }

    pub async fn get_project(&self, project_id: &str) -> Result<Value, ClientError> {
        self.get(&["mcp", "projects", project_id]).await
    }

    /// Deployment status, pod health and URLs for both environments.
    pub async fn get_project_info(&self, project_id: &str) -> Result<Value, ClientError> {
        self.get(&["mcp", "projects", project_id, "info"]).await
    }

    pub async fn get_schema(&self, project_id: &str) -> Result<Value, ClientError> {
        self.get(&["mcp", "projects", project_id, "schema"]).await
    }

    pub async fn get_schema_at_version(
        &self,
        project_id: &str,
        version: &str,
    ) -> Result<Value, ClientError> {
        self.get(&["mcp", "projects", project_id, "schema", "version", version])
            .await
    }

    pub async fn get_version_history(&self, project_id: &str) -> Result<Value, ClientError> {
        self.get(&["mcp", "projects", project_id, "versions"]).await
    }

    pub async fn get_project_usage(&self, project_id: &str) -> Result<Value, ClientError> {
        self.get(&["mcp", "projects", project_id, "usage"]).await
    }

    pub async fn get_job_status(&self, job_id: &str) -> Result<Value, ClientError> {
        self.get(&["mcp", "jobs", job_id]).await
    }

    pub async fn get_user_info(&self) -> Result<Value, ClientError> {
        self.get(&["mcp", "user"]).await
    }

    pub async fn get_subscription_status(&self) -> Result<Value, ClientError> {
        self.get(&["mcp", "subscription"]).await
    }

    pub async fn get_template_schemas(&self) -> Result<Value, ClientError> {
        self.get(&["mcp", "templates"]).await
    }

    // ── Write operations ─────────────────────────────────────────────────────

    /// Create a project and queue its first staging deployment.
    /// `description` is only sent when non-empty.
    pub async fn create_project(
        &self,
        name: &str,
        schema: &Value,
        description: Option<&str>,
    ) -> Result<Value, ClientError> {
        let mut body = json!({ "name": name, "schema": schema });
        if let Some(d) = description.filter(|d| !d.is_empty()) {
            body["description"] = Value::String(d.to_string());
        }
        self.send(Method::POST, &["mcp", "projects"], Some(body)).await
    }

    pub async fn update_schema(&self, project_id: &str, schema: &Value) -> Result<Value, ClientError> {
        self.send(
            Method::PUT,
            &["mcp", "projects", project_id, "schema"],
            Some(json!({ "schema": schema })),
        )
        .await
    }

    pub async fn deploy_staging(&self, project_id: &str) -> Result<Value, ClientError> {
        self.send(
            Method::POST,
            &["mcp", "projects", project_id, "deploy", "staging"],
            None,
        )
        .await
    }

    pub async fn deploy_production(&self, project_id: &str) -> Result<Value, ClientError> {
        self.send(
            Method::POST,
            &["mcp", "projects", project_id, "deploy", "production"],
            None,
        )
        .await
    }

    pub async fn delete_project(&self, project_id: &str) -> Result<Value, ClientError> {
        self.send(Method::DELETE, &["mcp", "projects", project_id], None)
            .await
    }

    pub async fn rollback_project(
        &self,
        project_id: &str,
        version: &str,
        environment: &str,
    ) -> Result<Value, ClientError> {
        self.send(
            Method::POST,
            &["mcp", "projects", project_id, "rollback"],
            Some(json!({ "version": version, "environment": environment })),
        )
        .await
    }

    pub async fn rename_project(&self, project_id: &str, name: &str) -> Result<Value, ClientError> {
        self.send(
            Method::PATCH,
            &["mcp", "projects", project_id],
            Some(json!({ "name": name })),
        )
        .await
    }

    /// Gateway liveness.  Never fails: an unreachable gateway is reported
    /// in the returned document.
    pub async fn health(&self) -> Value {
        match self.get(&["api", "mcp", "health"]).await {
            Ok(v) => v,
            Err(e) => json!({ "status": "unreachable", "error": e.to_string() }),
        }
    }

    // ── Transport ────────────────────────────────────────────────────────────

    fn url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get(&self, segments: &[&str]) -> Result<Value, ClientError> {
        self.send(Method::GET, segments, None).await
    }

    /// Issue one request, retrying connection failures, timeouts and 503
    /// with exponential backoff.
    async fn send(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<Value>,
    ) -> Result<Value, ClientError> {
        let url = self.url(segments)?;
        let mut last_error = String::new();

        for attempt in 0..self.max_retries {
            let is_last = attempt + 1 == self.max_retries;
            debug!(%method, path = url.path(), attempt, "gateway request");

            let mut req = self
                .http
                .request(method.clone(), url.clone())
                .bearer_auth(&self.api_key);
            if let Some(b) = &body {
                req = req.json(b);
            }

            match req.send().await {
                Ok(resp) if resp.status().as_u16() == 503 && !is_last => {
                    warn!(path = url.path(), attempt, "gateway unavailable, retrying");
                    last_error = "HTTP 503".into();
                }
                Ok(resp) => return decode(resp).await,
                Err(e) if e.is_connect() || e.is_timeout() => {
                    last_error = if e.is_timeout() {
                        format!("Request timed out: {e}")
                    } else {
                        format!("Connection failed: {e}")
                    };
                    warn!(path = url.path(), attempt, error = %last_error, "gateway request failed");
                }
                Err(e) => return Err(e.into()),
            }

            if !is_last {
                tokio::time::sleep(self.backoff(attempt)).await;
            }
        }

        Err(ClientError::RetriesExhausted {
            attempts: self.max_retries,
            last: last_error,
        })
    }

    fn backoff(&self, attempt: u32) -> Duration {
        self.retry_base_delay.saturating_mul(1u32 << attempt.min(16))
    }
}

async fn decode(resp: reqwest::Response) -> Result<Value, ClientError> {
    let status = resp.status();
    let text = resp.text().await?;
    if !status.is_success() {
        return Err(ClientError::from_status(status.as_u16(), text));
    }
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> LogicBlokClient {
        let settings = GatewaySettings {
            base_url: base.into(),
            ..GatewaySettings::default()
        };
        LogicBlokClient::new("rb_sk_0123456789abcdefghij", &settings).unwrap()
    }

    #[test]
    fn url_joins_and_encodes_segments() {
        let c = client("https://gw.example/");
        let url = c.url(&["mcp", "projects", "a b/c"]).unwrap();
        assert_eq!(url.as_str(), "https://gw.example/mcp/projects/a%20b%2Fc");
    }

    #[test]
    fn url_keeps_base_path_prefix() {
        let c = client("https://gw.example/v2");
        let url = c.url(&["mcp", "user"]).unwrap();
        assert_eq!(url.as_str(), "https://gw.example/v2/mcp/user");
    }

    #[test]
    fn backoff_doubles() {
        let c = client("https://gw.example");
        assert_eq!(c.backoff(0), Duration::from_secs(1));
        assert_eq!(c.backoff(1), Duration::from_secs(2));
        assert_eq!(c.backoff(2), Duration::from_secs(4));
    }

    #[test]
    fn rejects_unparseable_base_url() {
        let settings = GatewaySettings {
            base_url: "not a url".into(),
            ..GatewaySettings::default()
        };
        assert!(matches!(
            LogicBlokClient::new("rb_sk_0123456789abcdefghij", &settings),
            Err(ClientError::InvalidUrl(_))
        ));
    }

    #[test]
    fn default_user_agent_carries_version() {
        let s = GatewaySettings::default();
        assert!(s.user_agent.starts_with("rationalbloks-mcp/"));
        assert_eq!(s.base_url, "https://logicblok.rationalbloks.com");
        assert_eq!(s.max_retries, 3);
    }
}
