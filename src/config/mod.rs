//! Configuration for remcache
//!
//! The cache client never reads the environment itself; the embedding
//! application builds a [`CacheConfig`] (directly, or through
//! [`ConfigLoader`]) and hands it to [`crate::cache::CacheManager`].
//!
//! # Configuration Priority (lowest to highest)
//! 1. Struct defaults
//! 2. TOML configuration file
//! 3. `REMCACHE_*` environment variables

pub mod error;
pub mod loader;
pub mod settings;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use settings::{CacheBackend, CacheConfig, MemoryConfig, RedisConfig};
