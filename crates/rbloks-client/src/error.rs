// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use crate::auth::ApiKeyError;

/// Failures surfaced to tool callers.  The display strings are shown to the
/// agent verbatim, so they say what to do next where that is known.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    ApiKey(#[from] ApiKeyError),

    #[error("Invalid API key. Get your key from https://rationalbloks.com/settings")]
    Unauthorized,

    #[error("Permission denied. Your API key lacks the required scope.")]
    Forbidden,

    #[error("Rate limit exceeded. Wait before making more requests.")]
    RateLimited,

    #[error("{0}")]
    BadRequest(String),

    #[error("Service temporarily unavailable. Try again later.")]
    ServiceUnavailable,

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Max retries ({attempts}) exceeded. Last error: {last}")]
    RetriesExhausted { attempts: u32, last: String },

    #[error("invalid gateway URL: {0}")]
    InvalidUrl(String),

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ClientError {
    /// Map a non-success status and its body to the matching error.
    pub(crate) fn from_status(status: u16, body: String) -> Self {
        match status {
            401 => ClientError::Unauthorized,
            403 => ClientError::Forbidden,
            429 => ClientError::RateLimited,
            400 if body.trim().is_empty() => ClientError::BadRequest("Invalid request".into()),
            400 => ClientError::BadRequest(body),
            503 => ClientError::ServiceUnavailable,
            _ => ClientError::Status { status, body },
        }
    }
}
