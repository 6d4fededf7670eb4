// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Multi-step generation with per-step bookkeeping.
//!
//! Steps are best-effort: a failing step is recorded in `steps_failed` and
//! the pipeline moves on.  Only a failed clone stops `create_app`, since
//! every later step writes into the cloned tree.  `success` is true when
//! every critical step completed.

use std::fmt::Display;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use rbloks_client::{ClientError, LogicBlokClient};
use rbloks_config::FrontendConfig;
use serde::Serialize;
use serde_json::Value;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::error::CodegenError;
use crate::generate;
use crate::naming::slugify;
use crate::npm::npm_install;
use crate::project::{cleanup_template_files, configure_env, ensure_project, update_package_json};
use crate::schema::FlatSchema;
use crate::template::clone_template;

pub const STEP_CLONE: &str = "clone_template";
pub const STEP_CREATE_BACKEND: &str = "create_backend";
pub const STEP_WAIT_DEPLOY: &str = "wait_for_deployment";
pub const STEP_TYPES: &str = "generate_types";
pub const STEP_API_SERVICE: &str = "generate_api_service";
pub const STEP_VIEWS: &str = "generate_views";
pub const STEP_DASHBOARD: &str = "generate_dashboard";
pub const STEP_ROUTES: &str = "update_routes";
pub const STEP_NAVBAR: &str = "update_navbar";
pub const STEP_CLEANUP: &str = "cleanup_template";
pub const STEP_PACKAGE_JSON: &str = "update_package_json";
pub const STEP_ENV: &str = "configure_env";
pub const STEP_NPM: &str = "npm_install";

const APP_CRITICAL_STEPS: &[&str] = &[STEP_CLONE, STEP_TYPES, STEP_VIEWS, STEP_ROUTES];
const SCAFFOLD_CRITICAL_STEPS: &[&str] = &[STEP_TYPES, STEP_VIEWS, STEP_ROUTES];

const MISSING_SCHEMA: &str = "Schema is required. The AI agent should infer the schema from the \
     description first using the create-project-from-description prompt.";

/// Backend operations `create_app` needs.  Implemented by the gateway
/// client; tests substitute a scripted fake.
#[async_trait]
pub trait BackendProvisioner: Send + Sync {
    async fn create_project(
        &self,
        name: &str,
        schema: &Value,
        description: Option<&str>,
    ) -> Result<Value, ClientError>;

    async fn job_status(&self, job_id: &str) -> Result<Value, ClientError>;

    async fn project_info(&self, project_id: &str) -> Result<Value, ClientError>;
}

#[async_trait]
impl BackendProvisioner for LogicBlokClient {
    async fn create_project(
        &self,
        name: &str,
        schema: &Value,
        description: Option<&str>,
    ) -> Result<Value, ClientError> {
        LogicBlokClient::create_project(self, name, schema, description).await
    }

    async fn job_status(&self, job_id: &str) -> Result<Value, ClientError> {
        self.get_job_status(job_id).await
    }

    async fn project_info(&self, project_id: &str) -> Result<Value, ClientError> {
        self.get_project_info(project_id).await
    }
}

// ─── Report ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepFailure {
    pub step: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BackendInfo {
    pub project_id: Option<String>,
    pub project_code: Option<String>,
    pub job_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staging_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StepReport {
    pub success: bool,
    pub app_name: String,
    pub steps_completed: Vec<String>,
    pub steps_failed: Vec<StepFailure>,
    pub project_path: Option<String>,
    pub backend: Option<BackendInfo>,
    pub generated_files: Vec<String>,
    pub next_steps: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl StepReport {
    fn new(app_name: &str) -> Self {
        Self {
            app_name: app_name.to_string(),
            ..Self::default()
        }
    }

    /// Record the outcome of `step`, passing a success value through.
    fn record<T, E: Display>(&mut self, step: &str, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(v) => {
                info!(step, "step completed");
                self.steps_completed.push(step.to_string());
                Some(v)
            }
            Err(e) => {
                warn!(step, error = %e, "step failed");
                self.fail(step, e.to_string());
                None
            }
        }
    }

    fn fail(&mut self, step: &str, error: String) {
        self.steps_failed.push(StepFailure {
            step: step.to_string(),
            error,
        });
    }

    fn add_file(&mut self, path: &Path) {
        self.generated_files.push(path.display().to_string());
    }

    pub fn completed(&self, step: &str) -> bool {
        self.steps_completed.iter().any(|s| s == step)
    }

    fn finish(&mut self, critical: &[&str]) {
        self.success = critical.iter().all(|s| self.completed(s));
    }

    fn abort(mut self, error: String, suggestion: Option<&str>) -> Self {
        self.success = false;
        self.error = Some(error);
        self.suggestion = suggestion.map(str::to_string);
        self
    }
}

fn str_field(v: &Value, key: &str) -> Option<String> {
    match v.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parse `schema`, or explain why it cannot be used for generation.
fn usable_schema(schema: &Value) -> Result<FlatSchema, CodegenError> {
    let empty = match schema {
        Value::Null => true,
        Value::Object(m) => m.is_empty(),
        _ => false,
    };
    if empty {
        return Err(CodegenError::Schema(MISSING_SCHEMA.into()));
    }
    FlatSchema::from_value(schema)
}

/// The generation steps shared by both pipelines.
fn generate_frontend(
    report: &mut StepReport,
    project: &Path,
    app_name: &str,
    schema: &FlatSchema,
    api_url: Option<&str>,
    cfg: &FrontendConfig,
) {
    if let Some(p) = report.record(STEP_TYPES, generate::generate_types(project, schema)) {
        report.add_file(&p);
    }
    if let Some(p) = report.record(
        STEP_API_SERVICE,
        generate::generate_api_service(project, schema, api_url, cfg),
    ) {
        report.add_file(&p);
    }
    if let Some(files) = report.record(STEP_VIEWS, generate::generate_all_views(project, schema)) {
        for p in &files {
            report.add_file(p);
        }
    }
    if let Some(p) = report.record(
        STEP_DASHBOARD,
        generate::generate_dashboard(project, app_name, schema),
    ) {
        report.add_file(&p);
    }
    if let Some(p) = report.record(STEP_ROUTES, generate::update_routes(project, schema, cfg)) {
        report.add_file(&p);
    }
    if let Some(p) = report.record(STEP_NAVBAR, generate::update_navbar(project, app_name, schema)) {
        report.add_file(&p);
    }
}

// ─── scaffold_frontend ───────────────────────────────────────────────────────

/// Generate every frontend file into an existing project.  `.env` is only
/// touched when `api_url` is given.
pub fn scaffold_frontend(
    project: &Path,
    app_name: &str,
    schema: &Value,
    api_url: Option<&str>,
    cfg: &FrontendConfig,
) -> StepReport {
    let report = StepReport::new(app_name);
    let schema = match usable_schema(schema) {
        Ok(s) => s,
        Err(e) => return report.abort(e.to_string(), e.suggestion()),
    };
    if let Err(e) = ensure_project(project) {
        return report.abort(e.to_string(), e.suggestion());
    }

    let mut report = report;
    report.project_path = Some(project.display().to_string());
    let api_url = api_url.filter(|u| !u.is_empty());

    generate_frontend(&mut report, project, app_name, &schema, api_url, cfg);
    if let Some(url) = api_url {
        report.record(STEP_ENV, configure_env(project, url));
    }

    report.finish(SCAFFOLD_CRITICAL_STEPS);
    report.next_steps = vec![
        format!("cd {}", project.display()),
        "npm install && npm run dev".into(),
        format!("Open {}", cfg.dev_server_url),
    ];
    report
}

// ─── create_app ──────────────────────────────────────────────────────────────

/// Inputs of [`AppGenerator::create_app`].
#[derive(Debug, Clone)]
pub struct AppRequest<'a> {
    pub name: &'a str,
    pub description: &'a str,
    /// Parent directory; the project lands in `destination/slug(name)`.
    pub destination: &'a Path,
    pub schema: &'a Value,
    pub wait_for_deployment: bool,
    pub run_npm_install: bool,
}

/// Template clone + backend + generated frontend, end to end.
pub struct AppGenerator<'a, P: BackendProvisioner + ?Sized> {
    backend: &'a P,
    cfg: &'a FrontendConfig,
    poll_interval: Duration,
    deploy_timeout: Duration,
}

impl<'a, P: BackendProvisioner + ?Sized> AppGenerator<'a, P> {
    pub fn new(backend: &'a P, cfg: &'a FrontendConfig) -> Self {
        Self {
            backend,
            cfg,
            poll_interval: Duration::from_secs(cfg.deploy_poll_interval_secs),
            deploy_timeout: Duration::from_secs(cfg.deploy_timeout_secs),
        }
    }

    /// Override deployment polling cadence.
    pub fn with_polling(mut self, interval: Duration, timeout: Duration) -> Self {
        self.poll_interval = interval;
        self.deploy_timeout = timeout;
        self
    }

    pub async fn create_app(&self, req: &AppRequest<'_>) -> StepReport {
        let mut report = StepReport::new(req.name);

        let schema = match usable_schema(req.schema) {
            Ok(s) => s,
            Err(e) => return report.abort(e.to_string(), e.suggestion()),
        };

        // 1. clone
        let slug = slugify(req.name);
        let project = req.destination.join(&slug);
        match clone_template(req.destination, &slug, self.cfg).await {
            Ok(_) => {
                report.steps_completed.push(STEP_CLONE.into());
                report.project_path = Some(project.display().to_string());
            }
            Err(e) => {
                report.fail(STEP_CLONE, e.to_string());
                return report.abort(format!("Clone failed: {e}"), e.suggestion());
            }
        }

        // 2-4. backend, deployment, staging URL
        let staging_url = self.provision_backend(&mut report, req).await;

        // 5-10. generated sources
        generate_frontend(
            &mut report,
            &project,
            req.name,
            &schema,
            staging_url.as_deref(),
            self.cfg,
        );

        // 11-13. project metadata
        report.record(STEP_CLEANUP, cleanup_template_files(&project));
        report.record(
            STEP_PACKAGE_JSON,
            update_package_json(&project, req.name, req.description),
        );
        if let Some(url) = &staging_url {
            report.record(STEP_ENV, configure_env(&project, url));
        }

        // 14. dependencies
        if req.run_npm_install {
            let timeout = Duration::from_secs(self.cfg.npm_install_timeout_secs);
            report.record(STEP_NPM, npm_install(&project, timeout).await);
        }

        report.finish(APP_CRITICAL_STEPS);
        let run = if report.completed(STEP_NPM) {
            "npm run dev"
        } else {
            "npm install && npm run dev"
        };
        report.next_steps = vec![
            format!("cd {}", project.display()),
            run.into(),
            format!("Open {}", self.cfg.dev_server_url),
        ];
        if let Some(url) = &staging_url {
            report.next_steps.insert(0, format!("Backend API: {url}"));
        }
        report
    }

    /// Create the backend project, optionally wait for its first deploy and
    /// resolve the staging URL.  Failures are recorded, never fatal.
    async fn provision_backend(&self, report: &mut StepReport, req: &AppRequest<'_>) -> Option<String> {
        let created = self
            .backend
            .create_project(req.name, req.schema, Some(req.description))
            .await;
        let created = report.record(STEP_CREATE_BACKEND, created)?;

        let mut backend = BackendInfo {
            project_id: str_field(&created, "project_id"),
            project_code: str_field(&created, "project_code"),
            job_id: str_field(&created, "job_id"),
            ..BackendInfo::default()
        };

        if req.wait_for_deployment {
            if let Some(job_id) = &backend.job_id {
                match self.wait_for_deployment(job_id).await {
                    Ok(()) => {
                        report.steps_completed.push(STEP_WAIT_DEPLOY.into());
                        backend.status = Some("deployed".into());
                    }
                    Err(e) => report.fail(STEP_WAIT_DEPLOY, e),
                }
            }
        }

        let reported_url = match &backend.project_id {
            Some(id) => match self.backend.project_info(id).await {
                Ok(info) => str_field(&info, "staging_url"),
                Err(e) => {
                    warn!(error = %e, "project info lookup failed, deriving staging URL");
                    None
                }
            },
            None => None,
        };
        let staging_url = reported_url.or_else(|| {
            backend
                .project_code
                .as_ref()
                .map(|code| self.cfg.staging_url_template.replace("{project_code}", code))
        });

        backend.staging_url = staging_url.clone();
        report.backend = Some(backend);
        staging_url
    }

    /// Poll the deployment job until it completes, fails or times out.
    /// Transient polling errors are ignored.
    async fn wait_for_deployment(&self, job_id: &str) -> Result<(), String> {
        let deadline = Instant::now() + self.deploy_timeout;
        loop {
            match self.backend.job_status(job_id).await {
                Ok(status) => match status.get("status").and_then(Value::as_str) {
                    Some("completed") => return Ok(()),
                    Some("failed") => {
                        return Err(str_field(&status, "error")
                            .unwrap_or_else(|| "Deployment failed".into()))
                    }
                    _ => {}
                },
                Err(e) => warn!(job_id, error = %e, "job status poll failed"),
            }
            if Instant::now() + self.poll_interval > deadline {
                return Err("Deployment timed out".into());
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    /// Scripted backend: `create_project` returns `created`, each
    /// `job_status` call pops the next scripted status.
    struct FakeBackend {
        created: Result<Value, u16>,
        statuses: Mutex<Vec<Result<Value, u16>>>,
        info: Result<Value, u16>,
    }

    impl FakeBackend {
        fn new(created: Value, statuses: Vec<Result<Value, u16>>, info: Value) -> Self {
            Self {
                created: Ok(created),
                statuses: Mutex::new(statuses),
                info: Ok(info),
            }
        }
    }

    fn err(status: u16) -> ClientError {
        ClientError::Status {
            status,
            body: "boom".into(),
        }
    }

    #[async_trait]
    impl BackendProvisioner for FakeBackend {
        async fn create_project(
            &self,
            _name: &str,
            _schema: &Value,
            _description: Option<&str>,
        ) -> Result<Value, ClientError> {
            self.created.clone().map_err(err)
        }

        async fn job_status(&self, _job_id: &str) -> Result<Value, ClientError> {
            let mut statuses = self.statuses.lock().unwrap();
            if statuses.is_empty() {
                return Ok(json!({ "status": "running" }));
            }
            statuses.remove(0).map_err(err)
        }

        async fn project_info(&self, _project_id: &str) -> Result<Value, ClientError> {
            self.info.clone().map_err(err)
        }
    }

    fn fast<'a>(backend: &'a FakeBackend, cfg: &'a FrontendConfig) -> AppGenerator<'a, FakeBackend> {
        AppGenerator::new(backend, cfg).with_polling(Duration::from_millis(1), Duration::from_millis(200))
    }

    fn request<'a>(dest: &'a Path, schema: &'a Value) -> AppRequest<'a> {
        AppRequest {
            name: "Todo App",
            description: "tasks",
            destination: dest,
            schema,
            wait_for_deployment: true,
            run_npm_install: false,
        }
    }

    #[tokio::test]
    async fn deployment_wait_ignores_poll_errors_until_completed() {
        let cfg = FrontendConfig::default();
        let backend = FakeBackend::new(
            json!({}),
            vec![Err(503), Ok(json!({ "status": "running" })), Ok(json!({ "status": "completed" }))],
            json!({}),
        );
        assert_eq!(fast(&backend, &cfg).wait_for_deployment("j1").await, Ok(()));
    }

    #[tokio::test]
    async fn deployment_failure_reports_job_error() {
        let cfg = FrontendConfig::default();
        let backend = FakeBackend::new(
            json!({}),
            vec![Ok(json!({ "status": "failed", "error": "CrashLoopBackOff" }))],
            json!({}),
        );
        assert_eq!(
            fast(&backend, &cfg).wait_for_deployment("j1").await,
            Err("CrashLoopBackOff".to_string())
        );

        let backend = FakeBackend::new(json!({}), vec![Ok(json!({ "status": "failed" }))], json!({}));
        assert_eq!(
            fast(&backend, &cfg).wait_for_deployment("j1").await,
            Err("Deployment failed".to_string())
        );
    }

    #[tokio::test]
    async fn deployment_wait_times_out() {
        let cfg = FrontendConfig::default();
        let backend = FakeBackend::new(json!({}), vec![], json!({}));
        let gen = AppGenerator::new(&backend, &cfg)
            .with_polling(Duration::from_millis(5), Duration::from_millis(20));
        assert_eq!(gen.wait_for_deployment("j1").await, Err("Deployment timed out".to_string()));
    }

    #[tokio::test]
    async fn backend_provisioning_prefers_reported_staging_url() {
        let cfg = FrontendConfig::default();
        let backend = FakeBackend::new(
            json!({ "project_id": "p1", "project_code": "abc123", "job_id": "j1" }),
            vec![Ok(json!({ "status": "completed" }))],
            json!({ "staging_url": "https://reported.example" }),
        );
        let schema = json!({ "tasks": {} });
        let dir = tempfile::tempdir().unwrap();
        let mut report = StepReport::new("Todo App");

        let url = fast(&backend, &cfg)
            .provision_backend(&mut report, &request(dir.path(), &schema))
            .await;
        assert_eq!(url.as_deref(), Some("https://reported.example"));
        assert_eq!(report.steps_completed, [STEP_CREATE_BACKEND, STEP_WAIT_DEPLOY]);
        let backend = report.backend.unwrap();
        assert_eq!(backend.project_id.as_deref(), Some("p1"));
        assert_eq!(backend.status.as_deref(), Some("deployed"));
    }

    #[tokio::test]
    async fn staging_url_falls_back_to_project_code() {
        let cfg = FrontendConfig::default();
        let backend = FakeBackend {
            created: Ok(json!({ "project_id": "p1", "project_code": "abc123" })),
            statuses: Mutex::new(vec![]),
            info: Err(500),
        };
        let schema = json!({ "tasks": {} });
        let dir = tempfile::tempdir().unwrap();
        let mut report = StepReport::new("Todo App");

        let url = fast(&backend, &cfg)
            .provision_backend(&mut report, &request(dir.path(), &schema))
            .await;
        assert_eq!(
            url.as_deref(),
            Some("https://abc123-staging.customersblok.rationalbloks.com")
        );
        // no job id → no wait step
        assert_eq!(report.steps_completed, [STEP_CREATE_BACKEND]);
    }

    #[tokio::test]
    async fn backend_failure_is_recorded_not_fatal() {
        let cfg = FrontendConfig::default();
        let backend = FakeBackend {
            created: Err(401),
            statuses: Mutex::new(vec![]),
            info: Ok(json!({})),
        };
        let schema = json!({ "tasks": {} });
        let dir = tempfile::tempdir().unwrap();
        let mut report = StepReport::new("Todo App");

        let url = fast(&backend, &cfg)
            .provision_backend(&mut report, &request(dir.path(), &schema))
            .await;
        assert!(url.is_none());
        assert!(report.backend.is_none());
        assert_eq!(report.steps_failed[0].step, STEP_CREATE_BACKEND);
    }

    #[tokio::test]
    async fn create_app_requires_schema() {
        let cfg = FrontendConfig::default();
        let backend = FakeBackend::new(json!({}), vec![], json!({}));
        let dir = tempfile::tempdir().unwrap();
        let schema = json!({});

        let report = fast(&backend, &cfg).create_app(&request(dir.path(), &schema)).await;
        assert!(!report.success);
        assert!(report.error.unwrap().starts_with("Schema is required."));
        assert!(report.suggestion.unwrap().contains("FLAT"));
        assert!(report.steps_completed.is_empty());
        assert!(!dir.path().join("todo-app").exists());
    }

    #[tokio::test]
    async fn create_app_stops_when_clone_fails() {
        let cfg = FrontendConfig::default();
        let backend = FakeBackend::new(json!({}), vec![], json!({}));
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("todo-app")).unwrap();
        let schema = json!({ "tasks": { "title": { "type": "string" } } });

        let report = fast(&backend, &cfg).create_app(&request(dir.path(), &schema)).await;
        assert!(!report.success);
        assert_eq!(report.steps_failed[0].step, STEP_CLONE);
        assert!(report.error.unwrap().starts_with("Clone failed: Directory already exists"));
        assert!(report.backend.is_none());
    }

    #[test]
    fn scaffold_writes_all_files_and_env() {
        let dir = tempfile::tempdir().unwrap();
        let schema = json!({
            "tasks": { "title": { "type": "string", "required": true } },
            "projects": { "name": { "type": "string" } }
        });
        let report = scaffold_frontend(
            dir.path(),
            "Todo",
            &schema,
            Some("https://api.example"),
            &FrontendConfig::default(),
        );
        assert!(report.success, "{report:?}");
        assert!(report.steps_failed.is_empty());
        assert_eq!(
            report.steps_completed,
            [
                STEP_TYPES,
                STEP_API_SERVICE,
                STEP_VIEWS,
                STEP_DASHBOARD,
                STEP_ROUTES,
                STEP_NAVBAR,
                STEP_ENV
            ]
        );
        // types, api, 4 views, dashboard, app, navbar
        assert_eq!(report.generated_files.len(), 9);
        let env = std::fs::read_to_string(dir.path().join(".env")).unwrap();
        assert_eq!(env, "VITE_DATABASE_API_URL=https://api.example\n");
    }

    #[test]
    fn scaffold_without_api_url_leaves_env_alone() {
        let dir = tempfile::tempdir().unwrap();
        let report = scaffold_frontend(
            dir.path(),
            "Todo",
            &json!({ "tasks": {} }),
            None,
            &FrontendConfig::default(),
        );
        assert!(report.success);
        assert!(!report.completed(STEP_ENV));
        assert!(!dir.path().join(".env").exists());
    }

    #[test]
    fn scaffold_rejects_nested_schema() {
        let dir = tempfile::tempdir().unwrap();
        let report = scaffold_frontend(
            dir.path(),
            "Todo",
            &json!({ "tasks": { "fields": { "title": { "type": "string" } } } }),
            None,
            &FrontendConfig::default(),
        );
        assert!(!report.success);
        assert!(report.error.unwrap().contains("FLAT"));
        assert!(report.generated_files.is_empty());
    }

    #[test]
    fn report_serializes_with_step_lists() {
        let mut report = StepReport::new("x");
        report.record::<(), &str>(STEP_TYPES, Ok(()));
        report.record::<(), &str>(STEP_VIEWS, Err("disk full"));
        let v = serde_json::to_value(&report).unwrap();
        assert_eq!(v["steps_completed"], json!(["generate_types"]));
        assert_eq!(v["steps_failed"], json!([{ "step": "generate_views", "error": "disk full" }]));
        assert!(v.get("error").is_none());
    }
}
