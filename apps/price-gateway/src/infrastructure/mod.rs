//! Infrastructure Layer - Adapters and external integrations.
//!
//! This layer contains the concrete implementations of the port interfaces
//! defined in the application layer.

/// Append-only audit log file.
pub mod audit;

/// Binance REST ticker client.
pub mod binance;

/// Cache store adapters (Redis, in-memory).
pub mod cache;

/// Configuration from environment variables.
pub mod config;

/// Health check HTTP endpoint.
pub mod health;

/// Price API HTTP adapter.
pub mod http;

/// Prometheus metrics instrumentation.
pub mod metrics;

/// Tracing and OpenTelemetry integration.
pub mod telemetry;
