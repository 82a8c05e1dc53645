//! Price Source Port (Driven Port)
//!
//! Interface for the upstream exchange that quotes spot prices.

use async_trait::async_trait;

use crate::domain::quote::Symbol;

/// Upstream price source error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PriceSourceError {
    /// Request could not be sent or the connection failed.
    #[error("network error: {message}")]
    Network {
        /// Error details.
        message: String,
    },

    /// Upstream answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// Upstream answered 2xx with a body that is not the expected JSON.
    #[error("invalid response: {message}")]
    InvalidResponse {
        /// Error details.
        message: String,
    },
}

/// Port for fetching spot prices from an exchange.
#[async_trait]
pub trait PriceSourcePort: Send + Sync {
    /// Human-readable name of the upstream, used in audit lines and errors.
    fn name(&self) -> &str;

    /// Fetch the raw price field for `symbol`.
    ///
    /// Returns `Ok(None)` when the upstream answered successfully but the
    /// response carries no price field.
    async fn fetch_price(&self, symbol: &Symbol) -> Result<Option<String>, PriceSourceError>;
}
