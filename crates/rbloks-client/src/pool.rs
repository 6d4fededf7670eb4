// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::auth::validate_api_key;
use crate::client::{GatewaySettings, LogicBlokClient};
use crate::error::ClientError;

/// Maximum number of distinct API keys kept warm at once.
pub const DEFAULT_POOL_CAPACITY: usize = 100;

/// SHA-256 of the API key; raw keys never become cache keys.
type KeyDigest = [u8; 32];

/// Shared gateway clients keyed by API key, least recently used evicted first.
pub struct ClientPool {
    settings: GatewaySettings,
    clients: Mutex<lru::LruCache<KeyDigest, Arc<LogicBlokClient>>>,
}

impl ClientPool {
    pub fn new(settings: GatewaySettings) -> Self {
        Self::with_capacity(settings, DEFAULT_POOL_CAPACITY)
    }

    pub fn with_capacity(settings: GatewaySettings, capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            settings,
            clients: Mutex::new(lru::LruCache::new(cap)),
        }
    }

    pub fn settings(&self) -> &GatewaySettings {
        &self.settings
    }

    /// Validate `api_key` and return the client bound to it, creating one on
    /// first use.
    pub fn client_for(&self, api_key: Option<&str>) -> Result<Arc<LogicBlokClient>, ClientError> {
        let key = validate_api_key(api_key)?;
        let digest: KeyDigest = Sha256::digest(key.as_bytes()).into();

        let mut clients = self.clients.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(client) = clients.get(&digest) {
            return Ok(Arc::clone(client));
        }

        let client = Arc::new(LogicBlokClient::new(key, &self.settings)?);
        debug!(key_id = %hex::encode(&digest[..4]), "created gateway client");
        clients.put(digest, Arc::clone(&client));
        Ok(client)
    }

    pub fn len(&self) -> usize {
        self.clients.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ClientPool {
    fn default() -> Self {
        Self::new(GatewaySettings::default())
    }
}
