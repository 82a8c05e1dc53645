//! Price Cache Port (Driven Port)
//!
//! Interface for the key-value store that holds recently fetched prices.

use std::time::Duration;

use async_trait::async_trait;

/// Cache store error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CacheError {
    /// The store could not be reached.
    #[error("Cache connection error: {message}")]
    ConnectionError {
        /// Error details.
        message: String,
    },

    /// The store rejected or failed a command.
    #[error("Cache command failed: {message}")]
    CommandFailed {
        /// Error details.
        message: String,
    },
}

/// Port for the price cache store.
///
/// Implementations must make `set_with_expiry` atomic: a reader sees either
/// no entry or the full value with its expiry applied.
#[async_trait]
pub trait PriceCachePort: Send + Sync {
    /// Get the value stored under `key`, or `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store `value` under `key`, expiring after `ttl`.
    async fn set_with_expiry(&self, key: &str, value: &str, ttl: Duration)
    -> Result<(), CacheError>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), CacheError>;
}
