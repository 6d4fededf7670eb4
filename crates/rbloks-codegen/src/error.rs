// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    #[error("{0}")]
    Schema(String),

    #[error("Project directory not found: {0}")]
    ProjectNotFound(String),

    #[error("Directory already exists: {0}")]
    AlreadyExists(String),

    #[error("Unknown template path: {0}")]
    UnknownTemplatePath(String),

    #[error("Git is not installed or not in PATH")]
    GitMissing,

    #[error("Git clone timed out after {0} seconds")]
    CloneTimeout(u64),

    #[error("Git clone failed: {0}")]
    CloneFailed(String),

    #[error("npm is not installed or not in PATH")]
    NpmMissing,

    #[error("npm install timed out after {0} seconds")]
    NpmTimeout(u64),

    #[error("npm install failed: {0}")]
    NpmFailed(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl CodegenError {
    /// What the caller should try next, when there is something useful to say.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            CodegenError::Schema(_) => {
                Some("Provide a schema in FLAT format: {table: {field: {type: 'string', ...}}}")
            }
            CodegenError::ProjectNotFound(_) => {
                Some("Run clone_template first or check the project path")
            }
            CodegenError::AlreadyExists(_) => {
                Some("Choose a different project name or delete the existing directory")
            }
            CodegenError::GitMissing => Some("Install git: https://git-scm.com/downloads"),
            CodegenError::CloneTimeout(_) => Some("Check your network connection"),
            CodegenError::CloneFailed(_) => {
                Some("Ensure git is installed and the repository is accessible")
            }
            CodegenError::NpmMissing => Some("Install Node.js: https://nodejs.org"),
            _ => None,
        }
    }

    pub(crate) fn io(path: &Path, action: &str) -> impl FnOnce(std::io::Error) -> Self {
        let context = format!("{action} {}", path.display());
        move |source| CodegenError::Io { context, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clone_errors_carry_suggestions() {
        assert_eq!(
            CodegenError::GitMissing.suggestion(),
            Some("Install git: https://git-scm.com/downloads")
        );
        assert_eq!(
            CodegenError::CloneTimeout(120).to_string(),
            "Git clone timed out after 120 seconds"
        );
        assert!(CodegenError::NpmFailed("x".into()).suggestion().is_none());
    }
}
