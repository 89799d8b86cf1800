//! NoOp cache implementation.
//!
//! Used when caching is disabled. Reads always miss, writes succeed
//! without storing anything.

use async_trait::async_trait;

use crate::cache::entry::CacheValue;
use crate::cache::{Cache, CacheError};

/// A no-operation cache that doesn't store anything.
///
/// Used when `enabled = false` in configuration.
pub struct NoOpCache;

impl NoOpCache {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoOpCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for NoOpCache {
    async fn has(&self, _key: &str) -> Result<bool, CacheError> {
        Ok(false)
    }

    async fn get(&self, key: &str) -> Result<CacheValue, CacheError> {
        Err(CacheError::NotFound(key.to_string()))
    }

    async fn set(
        &self,
        _key: &str,
        _value: CacheValue,
        _ttl_seconds: Option<u64>,
    ) -> Result<(), CacheError> {
        Ok(())
    }

    async fn forget(&self, _key: &str) -> Result<(), CacheError> {
        Ok(())
    }

    async fn empty(&self) -> Result<(), CacheError> {
        Ok(())
    }

    async fn empty_by_match(&self, _pattern: &str) -> Result<(), CacheError> {
        Ok(())
    }
}
