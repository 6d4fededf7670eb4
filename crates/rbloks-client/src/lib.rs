// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! HTTP client for the LogicBlok gateway.
//!
//! Every platform operation is a Bearer-authenticated JSON call against a
//! fixed base URL.  [`LogicBlokClient`] wraps one API key; [`ClientPool`]
//! hands out shared clients per key so the HTTP transport can serve many
//! callers without rebuilding connection pools on every request.

pub mod auth;
mod client;
mod error;
mod pool;

pub use auth::{extract_bearer, validate_api_key, ApiKeyError, API_KEY_PREFIX};
pub use client::{GatewaySettings, LogicBlokClient};
pub use error::ClientError;
pub use pool::{ClientPool, DEFAULT_POOL_CAPACITY};
