//! Cache module providing a client for a remote key-value store.
//!
//! This module provides a unified caching interface that supports:
//! - Redis cache (distributed, network-based)
//! - Memory cache (in-process, for local development and tests)
//!
//! Every backend speaks the same six operations: `has`, `get`, `set`,
//! `forget`, `empty` and `empty_by_match`. Values are polymorphic
//! ([`CacheValue`]) and travel through a self-describing codec
//! ([`encode`]/[`decode`]), so heterogeneous payloads round-trip without an
//! external schema.
//!
//! # Configuration
//!
//! Configure caching in your TOML config file:
//!
//! ```toml
//! enabled = true
//! backend = "redis"  # or "memory"
//!
//! [memory]
//! max_entries = 1000
//!
//! [redis]
//! host = "127.0.0.1"
//! port = 6379
//! database = 0
//! pool_size = 4
//! connection_timeout = 5
//! response_timeout = 5
//! key_prefix = "remcache"
//! tls_enabled = false
//! ```
//!
//! # Usage
//!
//! ```
//! use remcache::{CacheConfig, CacheManager, CacheValue};
//!
//! async fn demo() -> Result<(), remcache::CacheError> {
//!     let cache = CacheManager::new(CacheConfig::default()).await?;
//!     cache.set("greeting", CacheValue::from("hello"), None).await?;
//!     assert_eq!(cache.get("greeting").await?, CacheValue::from("hello"));
//!     cache.forget("greeting").await?;
//!     assert!(!cache.has("greeting").await?);
//!     Ok(())
//! }
//! ```

mod entry;
mod error;
mod manager;
mod memory;
mod noop;
mod redis;
mod traits;

pub use entry::{CacheValue, Entry, decode, encode};
pub use error::CacheError;
pub use manager::CacheManager;
pub use memory::MemoryCache;
pub use noop::NoOpCache;
pub use redis::RedisCache;
pub use traits::Cache;
