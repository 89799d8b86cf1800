//! Cache trait definition.

use async_trait::async_trait;

use crate::cache::CacheError;
use crate::cache::entry::CacheValue;

/// Operations every cache backend supports.
///
/// This is the entire surface the rest of a system uses. Implementations
/// must be safe for concurrent use from multiple tasks; callers never
/// manage locking themselves. Bulk clears are not atomic with respect to
/// concurrent `set`/`forget` on overlapping keys.
#[async_trait]
pub trait Cache: Send + Sync {
    /// True iff `key` currently exists. Absence is not an error.
    async fn has(&self, key: &str) -> Result<bool, CacheError>;

    /// Return the value stored at `key`.
    ///
    /// Fails with [`CacheError::NotFound`] when the key is absent, distinct
    /// from transport failures.
    async fn get(&self, key: &str) -> Result<CacheValue, CacheError>;

    /// Store `value` under `key`, replacing any prior value and its TTL.
    ///
    /// `None` stores without expiration; expiry policy belongs to the
    /// caller, not this layer.
    async fn set(
        &self,
        key: &str,
        value: CacheValue,
        ttl_seconds: Option<u64>,
    ) -> Result<(), CacheError>;

    /// Delete `key`. Deleting an absent key succeeds (idempotent).
    async fn forget(&self, key: &str) -> Result<(), CacheError>;

    /// Delete every key in this client's namespace.
    async fn empty(&self) -> Result<(), CacheError>;

    /// Delete every key whose name contains `pattern`.
    ///
    /// Keys removed by other callers between scan and delete are treated as
    /// already forgotten.
    async fn empty_by_match(&self, pattern: &str) -> Result<(), CacheError>;
}
