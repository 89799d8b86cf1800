//! remcache
//!
//! Client library for a remote key-value cache backed by Redis, with an
//! in-process memory backend for local development and tests.

pub mod cache;
pub mod config;

pub use cache::{
    Cache, CacheError, CacheManager, CacheValue, Entry, MemoryCache, NoOpCache, RedisCache, decode,
    encode,
};
pub use config::{CacheBackend, CacheConfig, ConfigError, ConfigLoader, MemoryConfig, RedisConfig};
