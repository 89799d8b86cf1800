//! Configuration loader for remcache
//!
//! This is a bootstrap-side helper: the embedding process uses it to build
//! a [`CacheConfig`] from a TOML file and environment overrides, then hands
//! the result to the cache client. The client itself never touches the
//! environment.

use std::path::PathBuf;

use config::{Config, Environment, File, FileFormat};

use crate::config::error::ConfigError;
use crate::config::settings::CacheConfig;

/// Environment variable prefix for configuration overrides
const ENV_PREFIX: &str = "REMCACHE";

/// Separator for nested configuration keys in environment variables
const ENV_SEPARATOR: &str = "__";

/// Configuration loader with layered sources
///
/// Sources in order of priority (lowest to highest):
/// 1. Struct defaults
/// 2. TOML configuration file (optional unless requested via [`Self::with_file`])
/// 3. `REMCACHE_*` environment variables
///
/// Double underscores separate nested keys, so `REMCACHE_REDIS__HOST`
/// maps to `redis.host` and `REMCACHE_BACKEND` to `backend`.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config_file: Option<PathBuf>,
    file_required: bool,
}

impl ConfigLoader {
    /// Create a loader that uses only defaults and environment overrides
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the given TOML file; loading fails if it does not exist
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self.file_required = true;
        self
    }

    /// Read the given TOML file if present, fall back to defaults otherwise
    pub fn with_optional_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self.file_required = false;
        self
    }

    /// Load and validate configuration from all sources
    pub fn load(&self) -> Result<CacheConfig, ConfigError> {
        let mut builder = Config::builder();

        if let Some(path) = &self.config_file {
            if self.file_required && !path.exists() {
                return Err(ConfigError::file_not_found(format!(
                    "Required configuration file not found: {}",
                    path.display()
                )));
            }

            builder = builder.add_source(
                File::new(path.to_str().unwrap_or_default(), FileFormat::Toml)
                    .required(self.file_required),
            );
        }

        // Environment variables always win, e.g. REMCACHE_REDIS__PORT=6380
        let builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR)
                .ignore_empty(true)
                .try_parsing(true),
        );

        let config = builder.build()?;
        let settings: CacheConfig = config.try_deserialize().map_err(|e| {
            ConfigError::ParseError(format!("Failed to deserialize configuration: {}", e))
        })?;

        settings.validate()?;

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::CacheBackend;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Loader tests mutate process environment; serialize them.
    static TEST_MUTEX: Mutex<()> = Mutex::new(());

    /// Helper to restore environment variables on drop
    struct EnvGuard {
        vars_to_restore: Vec<(String, Option<String>)>,
    }

    impl EnvGuard {
        fn new() -> Self {
            Self {
                vars_to_restore: Vec::new(),
            }
        }

        fn set(&mut self, key: &str, value: &str) {
            let original = std::env::var(key).ok();
            self.vars_to_restore.push((key.to_string(), original));
            unsafe {
                std::env::set_var(key, value);
            }
        }

        fn remove(&mut self, key: &str) {
            let original = std::env::var(key).ok();
            self.vars_to_restore.push((key.to_string(), original));
            unsafe {
                std::env::remove_var(key);
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, original_value) in &self.vars_to_restore {
                unsafe {
                    match original_value {
                        Some(value) => std::env::set_var(key, value),
                        None => std::env::remove_var(key),
                    }
                }
            }
        }
    }

    fn clear_remcache_env(env: &mut EnvGuard) {
        env.remove("REMCACHE_ENABLED");
        env.remove("REMCACHE_BACKEND");
        env.remove("REMCACHE_REDIS__HOST");
        env.remove("REMCACHE_REDIS__PORT");
        env.remove("REMCACHE_REDIS__KEY_PREFIX");
    }

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("cache.toml");
        fs::write(&path, content).expect("Failed to write config file");
        path
    }

    #[test]
    fn test_load_defaults_without_sources() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        clear_remcache_env(&mut env);

        let config = ConfigLoader::new().load().expect("Should load defaults");
        assert_eq!(config, CacheConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        clear_remcache_env(&mut env);

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = write_config(
            &temp_dir,
            r#"
backend = "redis"

[redis]
host = "cache.internal"
port = 6380
key_prefix = "orders"
"#,
        );

        let config = ConfigLoader::new()
            .with_file(&path)
            .load()
            .expect("Should load settings");

        assert_eq!(config.backend, CacheBackend::Redis);
        assert_eq!(config.redis.host, "cache.internal");
        assert_eq!(config.redis.port, 6380);
        assert_eq!(config.redis.key_prefix, "orders");
        // Values not in the file keep their defaults
        assert_eq!(config.redis.pool_size, 4);
    }

    #[test]
    fn test_load_missing_required_file() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        clear_remcache_env(&mut env);

        let result = ConfigLoader::new()
            .with_file("/nonexistent/cache.toml")
            .load();

        assert!(result.is_err());
        if let Err(ConfigError::FileNotFound(msg)) = result {
            assert!(msg.contains("cache.toml"));
        } else {
            panic!("Expected FileNotFound error");
        }
    }

    #[test]
    fn test_load_missing_optional_file() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        clear_remcache_env(&mut env);

        let config = ConfigLoader::new()
            .with_optional_file("/nonexistent/cache.toml")
            .load()
            .expect("Optional file may be absent");
        assert_eq!(config, CacheConfig::default());
    }

    #[test]
    fn test_env_overrides_file() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        clear_remcache_env(&mut env);

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = write_config(
            &temp_dir,
            r#"
backend = "redis"

[redis]
host = "cache.internal"
port = 6380
"#,
        );

        env.set("REMCACHE_REDIS__HOST", "override.internal");
        env.set("REMCACHE_REDIS__PORT", "7000");

        let config = ConfigLoader::new()
            .with_file(&path)
            .load()
            .expect("Should load settings");

        assert_eq!(config.redis.host, "override.internal");
        assert_eq!(config.redis.port, 7000);
        // File still supplies what the environment does not
        assert_eq!(config.backend, CacheBackend::Redis);
    }

    #[test]
    fn test_load_rejects_invalid_settings() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        clear_remcache_env(&mut env);

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = write_config(
            &temp_dir,
            r#"
backend = "redis"

[redis]
pool_size = 0
"#,
        );

        let result = ConfigLoader::new().with_file(&path).load();
        assert!(result.is_err());
        if let Err(ConfigError::ValidationError { field, .. }) = result {
            assert_eq!(field, "cache.redis.pool_size");
        } else {
            panic!("Expected ValidationError");
        }
    }
}
