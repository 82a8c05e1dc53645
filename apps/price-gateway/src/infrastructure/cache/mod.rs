//! Price Cache Adapters
//!
//! Implementations of `PriceCachePort`.
//!
//! - `RedisPriceCache`: Redis `GET` / `SETEX` over a managed async connection
//! - `InMemoryPriceCache`: Process-local map with per-entry deadlines

mod in_memory;
mod redis_cache;

pub use in_memory::InMemoryPriceCache;
pub use redis_cache::RedisPriceCache;
