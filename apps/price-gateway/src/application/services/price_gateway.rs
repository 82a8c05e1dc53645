//! Price Gateway Use Case
//!
//! Cache-aside lookup of a spot price: consult the cache store, fall back
//! to the exchange on a miss, write the fetched price back with a fixed
//! expiry, and append an audit line for every outcome.
//!
//! No retries and no stale-cache fallback: every upstream failure is
//! surfaced to the caller immediately.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;

use crate::application::ports::{
    AuditLogError, AuditLogPort, CacheError, PriceCachePort, PriceSourceError, PriceSourcePort,
};
use crate::domain::quote::{PriceQuote, Symbol};

/// Default lifetime of a cached price.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(10);

/// Price lookup failure.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Upstream answered but carried no usable price.
    #[error("price not found for {symbol}")]
    NotFound {
        /// Normalized symbol.
        symbol: Symbol,
    },

    /// Upstream could not be reached or answered with an error.
    #[error("failed to fetch price for {symbol} from {upstream}: {error}")]
    UpstreamUnavailable {
        /// Normalized symbol.
        symbol: Symbol,
        /// Upstream name.
        upstream: String,
        /// Underlying failure.
        #[source]
        error: PriceSourceError,
    },

    /// Cache store failure.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Audit log failure.
    #[error(transparent)]
    AuditLog(#[from] AuditLogError),
}

/// Cache-aside price lookup over injected ports.
pub struct PriceGateway<C, S, L>
where
    C: PriceCachePort,
    S: PriceSourcePort,
    L: AuditLogPort,
{
    cache: Arc<C>,
    source: Arc<S>,
    audit_log: Arc<L>,
    cache_ttl: Duration,
}

impl<C, S, L> PriceGateway<C, S, L>
where
    C: PriceCachePort,
    S: PriceSourcePort,
    L: AuditLogPort,
{
    /// Create a new `PriceGateway` with the default cache lifetime.
    pub const fn new(cache: Arc<C>, source: Arc<S>, audit_log: Arc<L>) -> Self {
        Self {
            cache,
            source,
            audit_log,
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }

    /// Override the cache lifetime.
    #[must_use]
    pub fn with_cache_ttl(mut self, cache_ttl: Duration) -> Self {
        self.cache_ttl = cache_ttl;
        self
    }

    /// Lifetime applied to every cache write.
    #[must_use]
    pub const fn cache_ttl(&self) -> Duration {
        self.cache_ttl
    }

    /// Look up the price for `raw_symbol`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the upstream response has no usable price.
    /// - `UpstreamUnavailable` if the upstream call fails.
    /// - `Cache` / `AuditLog` if either store fails; these are not guarded.
    pub async fn get_price(&self, raw_symbol: &str) -> Result<PriceQuote, GatewayError> {
        let symbol = Symbol::new(raw_symbol);
        let cache_key = symbol.cache_key();

        let cached = self.cache.get(&cache_key).await?;
        if let Some(price) = cached.filter(|p| !p.is_empty()) {
            tracing::debug!(symbol = %symbol, "Cache hit");
            self.audit_log
                .record(&format!("Returned cached price for {symbol}: {price}"))
                .await?;
            return Ok(PriceQuote::cached(symbol, price));
        }

        tracing::debug!(symbol = %symbol, "Cache miss, querying upstream");
        let upstream = self.source.name().to_string();

        let price = match self.source.fetch_price(&symbol).await {
            Ok(price) => price,
            Err(error) => {
                tracing::warn!(symbol = %symbol, upstream = %upstream, error = %error, "Upstream fetch failed");
                self.audit_log
                    .record(&format!(
                        "Failed to fetch price for {symbol} from {upstream}: {error}"
                    ))
                    .await?;
                return Err(GatewayError::UpstreamUnavailable {
                    symbol,
                    upstream,
                    error,
                });
            }
        };

        let Some(price) = price.filter(|p| is_usable_price(p)) else {
            tracing::info!(symbol = %symbol, upstream = %upstream, "Upstream returned no price");
            self.audit_log
                .record(&format!("Price not found for {symbol} from {upstream}"))
                .await?;
            return Err(GatewayError::NotFound { symbol });
        };

        self.cache
            .set_with_expiry(&cache_key, &price, self.cache_ttl)
            .await?;

        self.audit_log
            .record(&format!(
                "Requested price for {symbol} from {upstream}: {price}"
            ))
            .await?;

        Ok(PriceQuote::upstream(symbol, price))
    }
}

/// A price is usable when it is non-empty and parses as a decimal.
fn is_usable_price(price: &str) -> bool {
    let trimmed = price.trim();
    !trimmed.is_empty() && Decimal::from_str(trimmed).is_ok()
}
