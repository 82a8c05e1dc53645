#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Crypto Price Gateway - Cached Spot Price Lookup
//!
//! An HTTP service that answers `GET /crypto/{symbol}` with the latest spot
//! price for a trading pair. Prices are served from a short-lived cache
//! when possible and fetched from the Binance ticker endpoint otherwise.
//! Every lookup appends one line to an audit log file.
//!
//! # Layers (inside → outside)
//!
//! - **Domain**: Core lookup types
//!   - `quote`: Symbols, cache keys, price quotes
//!
//! - **Application**: Use cases and port definitions
//!   - `ports`: Interfaces for the cache store, exchange, and audit log
//!   - `services`: Cache-aside price lookup
//!
//! - **Infrastructure**: Adapters and external integrations
//!   - `cache`: Redis and in-memory cache stores
//!   - `binance`: REST ticker client
//!   - `audit`: Append-only audit log file
//!   - `http`: Price API router and server
//!   - `config`: Configuration from environment
//!   - `health`: Health check HTTP endpoint
//!
//! # Data Flow
//!
//! ```text
//! Client ──► GET /crypto/{symbol} ──► PriceGateway ──► Cache (hit) ──┐
//!                                          │                        │
//!                                          └──► Binance (miss) ──► Cache write
//!                                                                   │
//!                                          Audit log ◄──────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Module Declarations
// =============================================================================

/// Domain layer - Core lookup types with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Re-exports
// =============================================================================

// Domain types
pub use domain::quote::{PriceQuote, QuoteSource, Symbol};

// Ports and use case
pub use application::ports::{
    AuditLogError, AuditLogPort, CacheError, NoOpAuditLog, PriceCachePort, PriceSourceError,
    PriceSourcePort,
};
pub use application::services::{DEFAULT_CACHE_TTL, GatewayError, PriceGateway};

// Infrastructure config
pub use infrastructure::config::{
    CacheBackend, CacheSettings, ConfigError, GatewayConfig, ServerSettings,
};

// Adapters
pub use infrastructure::audit::FileAuditLog;
pub use infrastructure::binance::{BinanceConfig, BinancePriceSource};
pub use infrastructure::cache::{InMemoryPriceCache, RedisPriceCache};

// HTTP surface
pub use infrastructure::http::{
    ApiServer, ApiServerError, AppState, ErrorResponse, create_router, join_servers, spawn_server,
};

// Health server
pub use infrastructure::health::{HealthServer, HealthServerError, HealthServerState};

// Metrics
pub use infrastructure::metrics::init_metrics;

// Telemetry
pub use infrastructure::telemetry::{TelemetryConfig, TelemetryGuard, init as init_telemetry};
