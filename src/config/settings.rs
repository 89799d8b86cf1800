//! Configuration settings structures for remcache
//!
//! This module defines the configuration records consumed by the cache
//! client. They can be built directly or loaded from TOML files and
//! environment variables through [`crate::config::ConfigLoader`].

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;

// ============================================================================
// Default value functions
// ============================================================================

fn default_true() -> bool {
    true
}

fn default_redis_host() -> String {
    "127.0.0.1".to_string()
}

fn default_redis_port() -> u16 {
    6379
}

fn default_redis_pool_size() -> u32 {
    4
}

fn default_redis_connection_timeout() -> u64 {
    5
}

fn default_redis_response_timeout() -> u64 {
    5
}

fn default_redis_key_prefix() -> String {
    "remcache".to_string()
}

fn default_memory_max_entries() -> usize {
    1000
}

// ============================================================================
// Cache Configuration
// ============================================================================

/// Cache backend type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    #[default]
    Memory,
    Redis,
}

/// Memory cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Maximum number of entries held in process
    #[serde(default = "default_memory_max_entries")]
    pub max_entries: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_entries: default_memory_max_entries(),
        }
    }
}

impl MemoryConfig {
    /// Validates the memory backend configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_entries == 0 {
            return Err(ConfigError::validation(
                "cache.memory.max_entries",
                "max_entries must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Redis backend configuration
///
/// The cache client receives these values from the surrounding bootstrap;
/// it never reads them from the environment itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Redis server host
    #[serde(default = "default_redis_host")]
    pub host: String,

    /// Redis server port
    #[serde(default = "default_redis_port")]
    pub port: u16,

    /// Password, if the server requires AUTH
    #[serde(default)]
    pub password: Option<String>,

    /// Logical database index (SELECT)
    #[serde(default)]
    pub database: u32,

    /// Connection pool size
    #[serde(default = "default_redis_pool_size")]
    pub pool_size: u32,

    /// Pool checkout timeout in seconds
    #[serde(default = "default_redis_connection_timeout")]
    pub connection_timeout: u64,

    /// Per-command response timeout in seconds
    #[serde(default = "default_redis_response_timeout")]
    pub response_timeout: u64,

    /// Key prefix namespacing every entry written by this client
    #[serde(default = "default_redis_key_prefix")]
    pub key_prefix: String,

    /// Whether to use TLS
    #[serde(default)]
    pub tls_enabled: bool,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: default_redis_host(),
            port: default_redis_port(),
            password: None,
            database: 0,
            pool_size: default_redis_pool_size(),
            connection_timeout: default_redis_connection_timeout(),
            response_timeout: default_redis_response_timeout(),
            key_prefix: default_redis_key_prefix(),
            tls_enabled: false,
        }
    }
}

impl RedisConfig {
    /// Render the connection URL for the driver
    pub fn url(&self) -> String {
        let scheme = if self.tls_enabled { "rediss" } else { "redis" };
        match &self.password {
            Some(password) => format!(
                "{}://:{}@{}:{}/{}",
                scheme, password, self.host, self.port, self.database
            ),
            None => format!("{}://{}:{}/{}", scheme, self.host, self.port, self.database),
        }
    }

    /// Validates the Redis backend configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::validation(
                "cache.redis.host",
                "host cannot be empty",
            ));
        }

        if self.port == 0 {
            return Err(ConfigError::validation(
                "cache.redis.port",
                "port must be non-zero",
            ));
        }

        if self.pool_size == 0 {
            return Err(ConfigError::validation(
                "cache.redis.pool_size",
                "pool_size must be at least 1",
            ));
        }

        if self.connection_timeout == 0 {
            return Err(ConfigError::validation(
                "cache.redis.connection_timeout",
                "connection_timeout must be at least 1 second",
            ));
        }

        if self.response_timeout == 0 {
            return Err(ConfigError::validation(
                "cache.redis.response_timeout",
                "response_timeout must be at least 1 second",
            ));
        }

        // Bulk clears scan "{prefix}:*"; an empty or wildcard prefix would
        // widen that scan past this client's namespace.
        if self.key_prefix.is_empty() {
            return Err(ConfigError::validation(
                "cache.redis.key_prefix",
                "key_prefix cannot be empty",
            ));
        }

        if self.key_prefix.contains(['*', '?']) {
            return Err(ConfigError::validation(
                "cache.redis.key_prefix",
                "key_prefix cannot contain glob characters",
            ));
        }

        Ok(())
    }
}

/// Cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Whether caching is enabled; when false all operations are no-ops
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Cache backend type
    #[serde(default)]
    pub backend: CacheBackend,

    /// Memory backend settings
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Redis backend settings
    #[serde(default)]
    pub redis: RedisConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            backend: CacheBackend::default(),
            memory: MemoryConfig::default(),
            redis: RedisConfig::default(),
        }
    }
}

impl CacheConfig {
    /// Validates the settings for the selected backend
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.enabled {
            return Ok(());
        }

        match self.backend {
            CacheBackend::Memory => self.memory.validate(),
            CacheBackend::Redis => self.redis.validate(),
        }
    }
}
