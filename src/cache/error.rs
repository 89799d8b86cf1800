//! Cache error types.

use thiserror::Error;

/// Errors that can occur during cache operations.
///
/// Absence of a key is an error only for `get`; the other operations treat
/// it as a normal outcome.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The backing store is unreachable, timed out, or returned a
    /// protocol-level failure. Never retried inside this layer.
    #[error("cache transport failed: {0}")]
    Transport(String),

    /// The requested key does not exist. Only returned by `get`.
    #[error("key not found in cache: {0}")]
    NotFound(String),

    /// A payload could not be encoded or decoded.
    #[error("cache payload codec failed: {0}")]
    Codec(String),
}

impl CacheError {
    /// True when this error is a plain cache miss.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CacheError::NotFound(_))
    }
}
