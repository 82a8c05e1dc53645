//! Price Quote Types
//!
//! Domain types for a single spot price lookup: the normalized symbol,
//! the quote returned to callers, and the cache key a symbol maps to.
//!
//! # Design
//!
//! A `Symbol` is upper-cased on construction, so every consumer that holds
//! one is guaranteed to see the normalized ticker. Cache keys are derived
//! only from a `Symbol`, which keeps `btcusdt` and `BTCUSDT` on one entry.

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Constants
// =============================================================================

/// Prefix for every price entry in the cache store.
pub const CACHE_KEY_PREFIX: &str = "crypto";

// =============================================================================
// Symbol
// =============================================================================

/// Exchange ticker symbol (for example `BTCUSDT`), always upper case.
///
/// No validation against a known symbol set is performed; unknown symbols
/// are left for the upstream exchange to reject.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Create a symbol, normalizing it to upper case.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self(raw.to_uppercase())
    }

    /// Get the normalized ticker.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Cache store key for this symbol: `crypto:{SYMBOL}`.
    #[must_use]
    pub fn cache_key(&self) -> String {
        format!("{CACHE_KEY_PREFIX}:{}", self.0)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Quote
// =============================================================================

/// Where a quote was served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteSource {
    /// Served from the cache store without an upstream call.
    Cache,
    /// Fetched from the exchange on a cache miss.
    Upstream,
}

impl QuoteSource {
    /// Get the source name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cache => "cache",
            Self::Upstream => "upstream",
        }
    }
}

/// Spot price for a symbol.
///
/// The price is kept as the exchange's decimal string so it round-trips
/// through the cache and the API response without reformatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    /// Normalized ticker.
    pub symbol: Symbol,
    /// Price as a decimal string.
    pub price: String,
    /// Where the price came from.
    pub source: QuoteSource,
}

impl PriceQuote {
    /// Quote served from the cache store.
    #[must_use]
    pub const fn cached(symbol: Symbol, price: String) -> Self {
        Self {
            symbol,
            price,
            source: QuoteSource::Cache,
        }
    }

    /// Quote fetched from the exchange.
    #[must_use]
    pub const fn upstream(symbol: Symbol, price: String) -> Self {
        Self {
            symbol,
            price,
            source: QuoteSource::Upstream,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
