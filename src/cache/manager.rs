//! Cache manager that dispatches to the configured backend.

use std::sync::Arc;

use crate::cache::entry::CacheValue;
use crate::cache::memory::MemoryCache;
use crate::cache::noop::NoOpCache;
use crate::cache::redis::RedisCache;
use crate::cache::{Cache, CacheError};
use crate::config::{CacheBackend, CacheConfig};

/// Cache manager that provides access to the configured cache backend.
#[derive(Clone)]
pub struct CacheManager {
    backend: Arc<dyn Cache>,
    config: CacheConfig,
}

impl CacheManager {
    /// Create a new cache manager with the given configuration.
    ///
    /// If caching is disabled, a NoOpCache is used.
    pub async fn new(config: CacheConfig) -> Result<Self, CacheError> {
        let backend: Arc<dyn Cache> = if !config.enabled {
            Arc::new(NoOpCache::new())
        } else {
            match config.backend {
                CacheBackend::Memory => Arc::new(MemoryCache::new(&config.memory)),
                CacheBackend::Redis => Arc::new(RedisCache::new(&config.redis).await?),
            }
        };

        tracing::debug!(
            enabled = config.enabled,
            backend = ?config.backend,
            "cache backend initialized"
        );

        Ok(Self { backend, config })
    }

    /// Get a reference to the cache backend.
    pub fn backend(&self) -> &Arc<dyn Cache> {
        &self.backend
    }

    /// Get the cache configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Check if caching is enabled.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    // ========================================================================
    // Cache proxy methods
    // ========================================================================

    /// Check whether a key exists.
    pub async fn has(&self, key: &str) -> Result<bool, CacheError> {
        self.backend.has(key).await
    }

    /// Get a value from the cache.
    pub async fn get(&self, key: &str) -> Result<CacheValue, CacheError> {
        self.backend.get(key).await
    }

    /// Set a value in the cache with optional TTL.
    pub async fn set(
        &self,
        key: &str,
        value: CacheValue,
        ttl_seconds: Option<u64>,
    ) -> Result<(), CacheError> {
        self.backend.set(key, value, ttl_seconds).await
    }

    /// Delete a key from the cache.
    pub async fn forget(&self, key: &str) -> Result<(), CacheError> {
        self.backend.forget(key).await
    }

    /// Delete every key in the cache namespace.
    pub async fn empty(&self) -> Result<(), CacheError> {
        self.backend.empty().await
    }

    /// Delete every key whose name contains the pattern.
    pub async fn empty_by_match(&self, pattern: &str) -> Result<(), CacheError> {
        self.backend.empty_by_match(pattern).await
    }
}
