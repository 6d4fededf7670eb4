// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! API-key format checks shared by the STDIO startup path and the HTTP
//! transport's per-request `Authorization` header.

/// Every platform key starts with this prefix.
pub const API_KEY_PREFIX: &str = "rb_sk_";

/// Minimum number of characters after the prefix.
const MIN_SECRET_LEN: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ApiKeyError {
    #[error("API key is required")]
    Missing,
    #[error("Invalid API key format - must start with 'rb_sk_'")]
    InvalidPrefix,
    #[error("API key is too short")]
    TooShort,
}

/// Check the shape of an API key without contacting the gateway.
pub fn validate_api_key(key: Option<&str>) -> Result<&str, ApiKeyError> {
    let key = match key {
        Some(k) if !k.is_empty() => k,
        _ => return Err(ApiKeyError::Missing),
    };
    if !key.starts_with(API_KEY_PREFIX) {
        return Err(ApiKeyError::InvalidPrefix);
    }
    if key.len() < API_KEY_PREFIX.len() + MIN_SECRET_LEN {
        return Err(ApiKeyError::TooShort);
    }
    Ok(key)
}

/// Pull a valid key out of an `Authorization: Bearer <key>` header value.
pub fn extract_bearer(header: Option<&str>) -> Option<String> {
    let key = header?.strip_prefix("Bearer ")?;
    validate_api_key(Some(key)).ok().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD: &str = "rb_sk_0123456789abcdefghij";

    #[test]
    fn accepts_well_formed_key() {
        assert_eq!(validate_api_key(Some(GOOD)), Ok(GOOD));
    }

    #[test]
    fn missing_and_empty_are_missing() {
        assert_eq!(validate_api_key(None), Err(ApiKeyError::Missing));
        assert_eq!(validate_api_key(Some("")), Err(ApiKeyError::Missing));
    }

    #[test]
    fn wrong_prefix_rejected() {
        let err = validate_api_key(Some("sk_0123456789abcdefghijklmn")).unwrap_err();
        assert_eq!(err, ApiKeyError::InvalidPrefix);
        assert_eq!(err.to_string(), "Invalid API key format - must start with 'rb_sk_'");
    }

    #[test]
    fn short_key_rejected() {
        assert_eq!(validate_api_key(Some("rb_sk_short")), Err(ApiKeyError::TooShort));
        // exactly prefix + 19 characters
        assert_eq!(
            validate_api_key(Some("rb_sk_0123456789abcdefghi")),
            Err(ApiKeyError::TooShort)
        );
    }

    #[test]
    fn bearer_extraction() {
        let header = format!("Bearer {GOOD}");
        assert_eq!(extract_bearer(Some(&header)).as_deref(), Some(GOOD));
        assert_eq!(extract_bearer(Some(GOOD)), None);
        assert_eq!(extract_bearer(Some("Basic abc")), None);
        assert_eq!(extract_bearer(Some("Bearer rb_sk_short")), None);
        assert_eq!(extract_bearer(None), None);
    }
}
