//! Application Layer - Use cases and port definitions.
//!
//! This layer contains the price gateway use case and the port interfaces
//! that define how it reaches the cache store, the exchange, and the audit log.

/// Port interfaces for external systems (cache, exchange, audit log).
pub mod ports;

/// Application services for price lookups.
pub mod services;
