//! Tracing and OpenTelemetry Setup
//!
//! Installs the `tracing` subscriber (fmt layer + `EnvFilter`) and, when
//! enabled, an OTLP span exporter. Operational logs go here; the per-request
//! audit trail is written separately by `infrastructure::audit`.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Extra filter directives (default: `price_gateway=info`)
//! - `OTEL_ENABLED`: Set to "true" to export spans (default: false)
//! - `OTEL_EXPORTER_OTLP_ENDPOINT`: OTLP endpoint (default: http://localhost:4317)
//! - `OTEL_SERVICE_NAME`: Service name for traces (default: crypto-price-gateway)
//!
//! # Usage
//!
//! ```ignore
//! use price_gateway::infrastructure::telemetry;
//!
//! // Keep the guard alive until shutdown
//! let _guard = telemetry::init();
//! ```

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_SERVICE_NAME: &str = "crypto-price-gateway";

const DEFAULT_OTLP_ENDPOINT: &str = "http://localhost:4317";

/// Directives applied on top of `RUST_LOG`.
const DEFAULT_DIRECTIVES: [&str; 4] = [
    "price_gateway=info",
    "reqwest=warn",
    "redis=warn",
    "hyper=warn",
];

/// Guard that flushes and shuts down the span exporter when dropped.
pub struct TelemetryGuard {
    tracer_provider: Option<SdkTracerProvider>,
}

impl TelemetryGuard {
    /// Whether spans are being exported.
    #[must_use]
    pub const fn is_exporting(&self) -> bool {
        self.tracer_provider.is_some()
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.tracer_provider.take()
            && let Err(e) = provider.shutdown()
        {
            eprintln!("Failed to shutdown OpenTelemetry tracer provider: {e}");
        }
    }
}

/// Telemetry configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Whether spans are exported over OTLP.
    pub enabled: bool,
    /// OTLP exporter endpoint.
    pub otlp_endpoint: String,
    /// Service name for traces.
    pub service_name: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            otlp_endpoint: DEFAULT_OTLP_ENDPOINT.to_string(),
            service_name: DEFAULT_SERVICE_NAME.to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            enabled: lookup("OTEL_ENABLED").is_some_and(|v| v.eq_ignore_ascii_case("true")),
            otlp_endpoint: lookup("OTEL_EXPORTER_OTLP_ENDPOINT").unwrap_or(defaults.otlp_endpoint),
            service_name: lookup("OTEL_SERVICE_NAME").unwrap_or(defaults.service_name),
        }
    }
}

/// Initialize telemetry from environment variables.
#[must_use]
pub fn init() -> TelemetryGuard {
    init_with_config(TelemetryConfig::from_env())
}

/// Initialize telemetry with an explicit configuration.
///
/// If the OTLP exporter cannot be built, logging still comes up with the
/// fmt layer only and the failure is reported as a warning.
#[must_use]
pub fn init_with_config(config: TelemetryConfig) -> TelemetryGuard {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let exporter = if config.enabled {
        opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .with_endpoint(&config.otlp_endpoint)
            .build()
            .map_err(|e| e.to_string())
            .map(Some)
    } else {
        Ok(None)
    };

    match exporter {
        Ok(Some(exporter)) => {
            let tracer_provider = SdkTracerProvider::builder()
                .with_batch_exporter(exporter)
                .with_resource(
                    opentelemetry_sdk::Resource::builder()
                        .with_service_name(config.service_name.clone())
                        .build(),
                )
                .build();

            let tracer = tracer_provider.tracer(config.service_name);
            tracing_subscriber::registry()
                .with(build_env_filter())
                .with(fmt_layer)
                .with(tracing_opentelemetry::layer().with_tracer(tracer))
                .init();

            TelemetryGuard {
                tracer_provider: Some(tracer_provider),
            }
        }
        Ok(None) => {
            tracing_subscriber::registry()
                .with(build_env_filter())
                .with(fmt_layer)
                .init();
            TelemetryGuard {
                tracer_provider: None,
            }
        }
        Err(e) => {
            tracing_subscriber::registry()
                .with(build_env_filter())
                .with(fmt_layer)
                .init();
            tracing::warn!(error = %e, endpoint = %config.otlp_endpoint, "OTLP exporter unavailable, span export disabled");
            TelemetryGuard {
                tracer_provider: None,
            }
        }
    }
}

fn build_env_filter() -> EnvFilter {
    DEFAULT_DIRECTIVES
        .iter()
        .filter_map(|d| d.parse::<Directive>().ok())
        .fold(EnvFilter::from_default_env(), EnvFilter::add_directive)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn default_config() {
        let config = TelemetryConfig::default();
        assert!(!config.enabled);
        assert_eq!(config.otlp_endpoint, DEFAULT_OTLP_ENDPOINT);
        assert_eq!(config.service_name, DEFAULT_SERVICE_NAME);
    }

    #[test]
    fn default_endpoint_is_otlp_grpc_port() {
        assert_eq!(
            TelemetryConfig::default().otlp_endpoint,
            "http://localhost:4317"
        );
    }

    #[test]
    fn config_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("OTEL_ENABLED", "TRUE"),
            ("OTEL_SERVICE_NAME", "gateway-staging"),
        ]
        .into_iter()
        .collect();

        let config = TelemetryConfig::from_lookup(|k| vars.get(k).map(|v| (*v).to_string()));
        assert!(config.enabled);
        assert_eq!(config.service_name, "gateway-staging");
        assert_eq!(config.otlp_endpoint, DEFAULT_OTLP_ENDPOINT);
    }

    #[test]
    fn otel_disabled_unless_true() {
        let config = TelemetryConfig::from_lookup(|k| {
            (k == "OTEL_ENABLED").then(|| "yes".to_string())
        });
        assert!(!config.enabled);
    }

    #[test]
    fn default_directives_parse() {
        for directive in DEFAULT_DIRECTIVES {
            assert!(
                directive.parse::<Directive>().is_ok(),
                "{directive}"
            );
        }
    }
}
