//! Prometheus Metrics Module
//!
//! Exposes gateway metrics in Prometheus format.
//!
//! # Metrics
//!
//! - `price_gateway_requests_total{outcome}`: Price lookups by outcome
//! - `price_gateway_upstream_seconds{result}`: Upstream round-trip latency
//!
//! # Integration
//!
//! Metrics are exposed at `/metrics` on the health server port.

use std::sync::OnceLock;
use std::time::Duration;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::application::services::GatewayError;
use crate::domain::quote::{PriceQuote, QuoteSource};

// =============================================================================
// Global Metrics Handle
// =============================================================================

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize the Prometheus metrics recorder.
///
/// # Panics
///
/// Panics if the recorder cannot be installed.
pub fn init_metrics() -> PrometheusHandle {
    PROMETHEUS_HANDLE
        .get_or_init(|| {
            let builder = PrometheusBuilder::new();
            let handle = builder
                .install_recorder()
                .expect("failed to install Prometheus recorder");

            register_metrics();
            handle
        })
        .clone()
}

/// Get the Prometheus handle for rendering metrics.
///
/// Returns `None` if metrics have not been initialized.
#[must_use]
pub fn get_metrics_handle() -> Option<PrometheusHandle> {
    PROMETHEUS_HANDLE.get().cloned()
}

// =============================================================================
// Metric Registration
// =============================================================================

fn register_metrics() {
    describe_counter!(
        "price_gateway_requests_total",
        "Total price lookups by outcome"
    );
    describe_histogram!(
        "price_gateway_upstream_seconds",
        "Round-trip time of upstream price requests"
    );
}

// =============================================================================
// Metric Recording Functions
// =============================================================================

/// Metric label for the outcome of a price lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Served from cache.
    CacheHit,
    /// Fetched from upstream.
    Upstream,
    /// Upstream had no usable price.
    NotFound,
    /// Upstream unreachable or failed.
    UpstreamError,
    /// Cache store or audit log failure.
    InternalError,
}

impl RequestOutcome {
    /// Classify a lookup result.
    #[must_use]
    pub const fn of(result: &Result<PriceQuote, GatewayError>) -> Self {
        match result {
            Ok(quote) => match quote.source {
                QuoteSource::Cache => Self::CacheHit,
                QuoteSource::Upstream => Self::Upstream,
            },
            Err(GatewayError::NotFound { .. }) => Self::NotFound,
            Err(GatewayError::UpstreamUnavailable { .. }) => Self::UpstreamError,
            Err(GatewayError::Cache(_) | GatewayError::AuditLog(_)) => Self::InternalError,
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::CacheHit => "cache_hit",
            Self::Upstream => "upstream",
            Self::NotFound => "not_found",
            Self::UpstreamError => "upstream_error",
            Self::InternalError => "internal_error",
        }
    }
}

/// Record a completed price lookup.
pub fn record_request(outcome: RequestOutcome) {
    counter!(
        "price_gateway_requests_total",
        "outcome" => outcome.as_str()
    )
    .increment(1);
}

/// Record an upstream round trip.
pub fn record_upstream_duration(success: bool, duration: Duration) {
    histogram!(
        "price_gateway_upstream_seconds",
        "result" => if success { "ok" } else { "error" }
    )
    .record(duration.as_secs_f64());
}

// =============================================================================
// Tests
// =============================================================================
