//! Port Interfaces
//!
//! Defines the interfaces (ports) the price gateway depends on, following
//! the Hexagonal Architecture pattern. Infrastructure adapters implement
//! these; the gateway service only ever sees the traits.
//!
//! ## Driven Ports (Outbound)
//!
//! - `PriceCachePort`: Key-value store with per-entry expiry
//! - `PriceSourcePort`: Exchange API that quotes spot prices
//! - `AuditLogPort`: Append-only sink for request outcomes

mod audit_log_port;
mod price_cache_port;
mod price_source_port;

pub use audit_log_port::{AuditLogError, AuditLogPort, NoOpAuditLog};
pub use price_cache_port::{CacheError, PriceCachePort};
pub use price_source_port::{PriceSourceError, PriceSourcePort};
