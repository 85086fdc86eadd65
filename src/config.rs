use std::{str::FromStr, time::Duration};

use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";
const DEFAULT_REDIS_DB: i64 = 0;
const DEFAULT_STORE_TIMEOUT_MS: u64 = 2000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} has invalid value '{value}'")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct LogConfig {
    pub file_path: Option<String>,
    pub archive_pattern: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub redis_url: String,
    pub redis_db: i64,
    pub store_timeout: Duration,
    pub log: LogConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source, falling back to
    /// defaults for anything unset or blank.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let store_timeout_ms = parse_var(&var, "STORE_TIMEOUT_MS", DEFAULT_STORE_TIMEOUT_MS)?;
        if store_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                name: "STORE_TIMEOUT_MS",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            host: var("KITTEN_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_var(&var, "KITTEN_PORT", DEFAULT_PORT)?,
            redis_url: var("REDIS_URL").unwrap_or_else(|| DEFAULT_REDIS_URL.to_string()),
            redis_db: parse_var(&var, "REDIS_DB", DEFAULT_REDIS_DB)?,
            store_timeout: Duration::from_millis(store_timeout_ms),
            log: LogConfig {
                file_path: var("LOG_FILE_PATH"),
                archive_pattern: var("LOG_ARCHIVE_PATTERN"),
            },
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<F, T>(var: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match var(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.redis_url, "redis://127.0.0.1:6379");
        assert_eq!(config.redis_db, 0);
        assert_eq!(config.store_timeout, Duration::from_secs(2));
        assert!(config.log.file_path.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("KITTEN_HOST", "127.0.0.1"),
            ("KITTEN_PORT", "9000"),
            ("REDIS_URL", "redis://cache:6380"),
            ("REDIS_DB", "3"),
            ("STORE_TIMEOUT_MS", "250"),
            ("LOG_FILE_PATH", "/tmp/kitten.log"),
        ])
        .unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:9000");
        assert_eq!(config.redis_url, "redis://cache:6380");
        assert_eq!(config.redis_db, 3);
        assert_eq!(config.store_timeout, Duration::from_millis(250));
        assert_eq!(config.log.file_path.as_deref(), Some("/tmp/kitten.log"));
    }

    #[test]
    fn test_blank_values_fall_back() {
        let config = config_from(&[("KITTEN_PORT", "  "), ("REDIS_URL", "")]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.redis_url, "redis://127.0.0.1:6379");
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            config_from(&[("KITTEN_PORT", "eighty")]),
            Err(ConfigError::InvalidValue { name: "KITTEN_PORT", .. })
        ));
        assert!(matches!(
            config_from(&[("STORE_TIMEOUT_MS", "0")]),
            Err(ConfigError::InvalidValue { name: "STORE_TIMEOUT_MS", .. })
        ));
    }
}
