//! Gateway Configuration Settings
//!
//! Configuration types for the price gateway, loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use crate::application::services::DEFAULT_CACHE_TTL;
use crate::infrastructure::audit::DEFAULT_AUDIT_LOG_PATH;
use crate::infrastructure::binance::DEFAULT_BASE_URL;

/// Default Redis connection URL.
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379/0";

/// Which cache store backs the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheBackend {
    /// External Redis server.
    #[default]
    Redis,
    /// Process-local map; entries are lost on restart.
    Memory,
}

impl CacheBackend {
    /// Parse backend from string. Unknown values fall back to Redis.
    #[must_use]
    pub fn from_str_case_insensitive(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "memory" | "in-memory" | "inmemory" => Self::Memory,
            _ => Self::Redis,
        }
    }

    /// Get the backend name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Redis => "redis",
            Self::Memory => "memory",
        }
    }
}

/// Server port settings.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    /// Price API port.
    pub http_port: u16,
    /// Health check and metrics port.
    pub health_port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            http_port: 8000,
            health_port: 8082,
        }
    }
}

/// Cache store settings.
#[derive(Debug, Clone)]
pub struct CacheSettings {
    /// Backend selection.
    pub backend: CacheBackend,
    /// Redis connection URL (ignored for the memory backend).
    pub redis_url: String,
    /// Lifetime of a cached price.
    pub ttl: Duration,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            backend: CacheBackend::default(),
            redis_url: DEFAULT_REDIS_URL.to_string(),
            ttl: DEFAULT_CACHE_TTL,
        }
    }
}

/// Complete gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Server port settings.
    pub server: ServerSettings,
    /// Cache store settings.
    pub cache: CacheSettings,
    /// Exchange REST base URL.
    pub upstream_base_url: String,
    /// Audit log file path.
    pub audit_log_path: PathBuf,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            cache: CacheSettings::default(),
            upstream_base_url: DEFAULT_BASE_URL.to_string(),
            audit_log_path: PathBuf::from(DEFAULT_AUDIT_LOG_PATH),
        }
    }
}

impl GatewayConfig {
    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an empty or invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an empty or invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let server = ServerSettings {
            http_port: parse_or(&lookup, "PRICE_GATEWAY_HTTP_PORT", defaults.server.http_port)?,
            health_port: parse_or(
                &lookup,
                "PRICE_GATEWAY_HEALTH_PORT",
                defaults.server.health_port,
            )?,
        };

        let ttl_secs: u64 = parse_or(
            &lookup,
            "PRICE_CACHE_TTL_SECS",
            defaults.cache.ttl.as_secs(),
        )?;
        if ttl_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "PRICE_CACHE_TTL_SECS".to_string(),
                value: "0".to_string(),
            });
        }

        let cache = CacheSettings {
            backend: lookup("CACHE_BACKEND")
                .map(|s| CacheBackend::from_str_case_insensitive(&s))
                .unwrap_or_default(),
            redis_url: non_empty_or(&lookup, "REDIS_URL", defaults.cache.redis_url)?,
            ttl: Duration::from_secs(ttl_secs),
        };

        let upstream_base_url =
            non_empty_or(&lookup, "BINANCE_API_URL", defaults.upstream_base_url)?;

        let audit_log_path = non_empty_or(
            &lookup,
            "AUDIT_LOG_PATH",
            defaults.audit_log_path.to_string_lossy().into_owned(),
        )?
        .into();

        Ok(Self {
            server,
            cache,
            upstream_base_url,
            audit_log_path,
        })
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Environment variable has empty value.
    #[error("environment variable {0} cannot be empty")]
    EmptyValue(String),
    /// Environment variable could not be parsed.
    #[error("environment variable {key} has invalid value {value:?}")]
    InvalidValue {
        /// Variable name.
        key: String,
        /// Raw value.
        value: String,
    },
}

fn non_empty_or(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: String,
) -> Result<String, ConfigError> {
    match lookup(key) {
        Some(v) if v.trim().is_empty() => Err(ConfigError::EmptyValue(key.to_string())),
        Some(v) => Ok(v),
        None => Ok(default),
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError> {
    lookup(key).map_or(Ok(default), |v| {
        v.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: v,
        })
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_with(vars: &[(&str, &str)]) -> Result<GatewayConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        GatewayConfig::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn cache_backend_parsing() {
        assert_eq!(
            CacheBackend::from_str_case_insensitive("memory"),
            CacheBackend::Memory
        );
        assert_eq!(
            CacheBackend::from_str_case_insensitive("MEMORY"),
            CacheBackend::Memory
        );
        assert_eq!(
            CacheBackend::from_str_case_insensitive("redis"),
            CacheBackend::Redis
        );
        assert_eq!(
            CacheBackend::from_str_case_insensitive("unknown"),
            CacheBackend::Redis
        );
    }

    #[test]
    fn defaults_when_unset() {
        let config = config_with(&[]).unwrap();
        assert_eq!(config.server.http_port, 8000);
        assert_eq!(config.server.health_port, 8082);
        assert_eq!(config.cache.backend, CacheBackend::Redis);
        assert_eq!(config.cache.redis_url, DEFAULT_REDIS_URL);
        assert_eq!(config.cache.ttl, Duration::from_secs(10));
        assert_eq!(config.upstream_base_url, "https://api.binance.com");
        assert_eq!(config.audit_log_path, PathBuf::from("crypto_requests.log"));
    }

    #[test]
    fn overrides_from_env() {
        let config = config_with(&[
            ("PRICE_GATEWAY_HTTP_PORT", "9000"),
            ("CACHE_BACKEND", "memory"),
            ("PRICE_CACHE_TTL_SECS", "30"),
            ("BINANCE_API_URL", "http://localhost:9999"),
            ("AUDIT_LOG_PATH", "/var/log/prices.log"),
        ])
        .unwrap();

        assert_eq!(config.server.http_port, 9000);
        assert_eq!(config.cache.backend, CacheBackend::Memory);
        assert_eq!(config.cache.ttl, Duration::from_secs(30));
        assert_eq!(config.upstream_base_url, "http://localhost:9999");
        assert_eq!(config.audit_log_path, PathBuf::from("/var/log/prices.log"));
    }

    #[test]
    fn invalid_port_rejected() {
        let err = config_with(&[("PRICE_GATEWAY_HTTP_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "PRICE_GATEWAY_HTTP_PORT"));
    }

    #[test]
    fn zero_ttl_rejected() {
        let err = config_with(&[("PRICE_CACHE_TTL_SECS", "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn empty_redis_url_rejected() {
        let err = config_with(&[("REDIS_URL", "  ")]).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyValue(ref key) if key == "REDIS_URL"));
    }
}
