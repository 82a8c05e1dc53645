//! Application Services
//!
//! Services that orchestrate domain logic and coordinate between ports.
//!
//! - `PriceGateway`: Cache-aside spot price lookup

mod price_gateway;

pub use price_gateway::{DEFAULT_CACHE_TTL, GatewayError, PriceGateway};
