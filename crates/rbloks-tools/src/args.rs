// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Argument extraction shared by every tool.

use rbloks_client::ClientError;
use rbloks_codegen::CodegenError;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("missing required argument '{0}'")]
    Missing(&'static str),

    #[error("argument '{name}' must be {expected}")]
    WrongType {
        name: &'static str,
        expected: &'static str,
    },

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Codegen(#[from] CodegenError),
}

pub fn required_str<'a>(args: &'a Value, name: &'static str) -> Result<&'a str, ToolError> {
    match args.get(name) {
        None | Some(Value::Null) => Err(ToolError::Missing(name)),
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(ToolError::WrongType {
            name,
            expected: "a string",
        }),
    }
}

pub fn optional_str<'a>(args: &'a Value, name: &'static str) -> Option<&'a str> {
    args.get(name).and_then(Value::as_str)
}

/// A required JSON object argument such as `schema` or `fields`.
pub fn required_object<'a>(args: &'a Value, name: &'static str) -> Result<&'a Value, ToolError> {
    match args.get(name) {
        None | Some(Value::Null) => Err(ToolError::Missing(name)),
        Some(v @ Value::Object(_)) => Ok(v),
        Some(_) => Err(ToolError::WrongType {
            name,
            expected: "an object",
        }),
    }
}

pub fn optional_bool(args: &Value, name: &str, default: bool) -> bool {
    args.get(name).and_then(Value::as_bool).unwrap_or(default)
}

pub fn optional_u64(args: &Value, name: &str, default: u64) -> u64 {
    args.get(name).and_then(Value::as_u64).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_and_null_are_reported_by_name() {
        let args = json!({ "project_id": null });
        assert_eq!(
            required_str(&args, "project_id").unwrap_err().to_string(),
            "missing required argument 'project_id'"
        );
        assert_eq!(
            required_str(&args, "version").unwrap_err().to_string(),
            "missing required argument 'version'"
        );
    }

    #[test]
    fn wrong_types_are_rejected() {
        let args = json!({ "project_id": 7, "schema": "x" });
        assert_eq!(
            required_str(&args, "project_id").unwrap_err().to_string(),
            "argument 'project_id' must be a string"
        );
        assert_eq!(
            required_object(&args, "schema").unwrap_err().to_string(),
            "argument 'schema' must be an object"
        );
    }

    #[test]
    fn optional_values_fall_back() {
        let args = json!({ "wait_for_deployment": false, "max_depth": 5 });
        assert!(!optional_bool(&args, "wait_for_deployment", true));
        assert!(optional_bool(&args, "run_npm_install", true));
        assert_eq!(optional_u64(&args, "max_depth", 3), 5);
        assert_eq!(optional_u64(&json!({}), "max_depth", 3), 3);
        assert_eq!(optional_str(&args, "api_url"), None);
    }
}
