//! In-memory TTL cache for upstream JSON responses.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use serde_json::Value;

struct CacheEntry {
    value: Value,
    expires_at: Instant,
}

/// Key-value store with per-entry expiry, keyed by upstream request URL.
///
/// Entries are evicted lazily on lookup; there is no size cap and no
/// background sweep. Writes are idempotent overwrites, so a concurrent
/// double-fetch of the same key at worst wastes one upstream request.
#[derive(Default)]
pub struct ResponseCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a cached response. An entry whose expiry is at or before now
    /// counts as absent and is removed as a side effect.
    pub fn get(&self, key: &str) -> Option<Value> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store a response, unconditionally overwriting any previous entry.
    pub fn insert(&self, key: String, value: Value, ttl: Duration) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        entries.insert(
            key,
            CacheEntry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
    }
}
