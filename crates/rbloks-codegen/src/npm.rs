// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::path::Path;
use std::time::Duration;

use tokio::process::Command;
use tracing::info;

use crate::error::CodegenError;

/// Run `npm install` in `project`, killing it after `timeout`.
pub async fn npm_install(project: &Path, timeout: Duration) -> Result<(), CodegenError> {
    info!(path = %project.display(), "running npm install");
    let mut cmd = Command::new("npm");
    cmd.arg("install").current_dir(project).kill_on_drop(true);

    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) if output.status.success() => Ok(()),
        Ok(Ok(output)) => Err(CodegenError::NpmFailed(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        )),
        Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => Err(CodegenError::NpmMissing),
        Ok(Err(e)) => Err(CodegenError::io(project, "running npm in")(e)),
        Err(_) => Err(CodegenError::NpmTimeout(timeout.as_secs())),
    }
}
