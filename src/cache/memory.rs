//! In-process cache implementation over DashMap.
//!
//! Stores the same encoded payloads the Redis backend does, so the codec
//! is exercised regardless of backend. Expiry is lazy: entries past their
//! deadline are dropped when next observed.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::cache::entry::{CacheValue, Entry, decode, encode};
use crate::cache::{Cache, CacheError};
use crate::config::MemoryConfig;

struct StoredEntry {
    payload: Vec<u8>,
    expires_at: Option<Instant>,
}

impl StoredEntry {
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }
}

/// In-memory cache with a bounded entry count.
pub struct MemoryCache {
    store: DashMap<String, StoredEntry>,
    max_entries: usize,
}

impl MemoryCache {
    pub fn new(config: &MemoryConfig) -> Self {
        Self {
            store: DashMap::new(),
            max_entries: config.max_entries,
        }
    }

    /// Return the live payload for `key`, dropping it if expired.
    fn fetch(&self, key: &str) -> Option<Vec<u8>> {
        let (payload, expired) = match self.store.get(key) {
            Some(entry) if entry.is_expired() => (None, true),
            Some(entry) => (Some(entry.payload.clone()), false),
            None => (None, false),
        };

        if expired {
            self.store.remove_if(key, |_, entry| entry.is_expired());
        }

        payload
    }

    /// Make room for one insertion: prefer dropping an expired entry,
    /// otherwise drop an arbitrary one.
    fn evict_one(&self) {
        let victim = self
            .store
            .iter()
            .find(|entry| entry.value().is_expired())
            .or_else(|| self.store.iter().next())
            .map(|entry| entry.key().clone());

        if let Some(key) = victim {
            self.store.remove(&key);
        }
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn has(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.fetch(key).is_some())
    }

    async fn get(&self, key: &str) -> Result<CacheValue, CacheError> {
        let payload = self
            .fetch(key)
            .ok_or_else(|| CacheError::NotFound(key.to_string()))?;

        let mut entry = decode(&payload)?;
        entry.remove(key).ok_or_else(|| {
            CacheError::Codec(format!("payload for '{}' does not contain its key", key))
        })
    }

    async fn set(
        &self,
        key: &str,
        value: CacheValue,
        ttl_seconds: Option<u64>,
    ) -> Result<(), CacheError> {
        let mut entry = Entry::new();
        entry.insert(key.to_string(), value);
        let payload = encode(&entry)?;

        if self.store.len() >= self.max_entries && !self.store.contains_key(key) {
            self.evict_one();
        }

        self.store.insert(
            key.to_string(),
            StoredEntry {
                payload,
                expires_at: ttl_seconds.map(|secs| Instant::now() + Duration::from_secs(secs)),
            },
        );
        Ok(())
    }

    async fn forget(&self, key: &str) -> Result<(), CacheError> {
        self.store.remove(key);
        Ok(())
    }

    async fn empty(&self) -> Result<(), CacheError> {
        self.store.clear();
        Ok(())
    }

    async fn empty_by_match(&self, pattern: &str) -> Result<(), CacheError> {
        self.store.retain(|key, _| !key.contains(pattern));
        Ok(())
    }
}
