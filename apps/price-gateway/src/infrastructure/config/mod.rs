//! Configuration Module
//!
//! Configuration loading for the price gateway.

mod settings;

pub use settings::{
    CacheBackend, CacheSettings, ConfigError, DEFAULT_REDIS_URL, GatewayConfig, ServerSettings,
};
