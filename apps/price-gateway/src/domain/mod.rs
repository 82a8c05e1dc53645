//! Domain Layer - Price quote types.
//!
//! This layer contains the core types for a price lookup with no
//! dependencies on the cache store, the exchange, or the HTTP surface.

/// Symbol normalization, quotes, and cache keys.
pub mod quote;
