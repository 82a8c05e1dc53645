//! Crypto Price Gateway Binary
//!
//! Starts the price API and the health server.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin price-gateway
//! ```
//!
//! # Environment Variables
//!
//! - `PRICE_GATEWAY_HTTP_PORT`: Price API port (default: 8000)
//! - `PRICE_GATEWAY_HEALTH_PORT`: Health check and metrics port (default: 8082)
//! - `BINANCE_API_URL`: Exchange REST base URL (default: <https://api.binance.com>)
//! - `CACHE_BACKEND`: redis | memory (default: redis)
//! - `REDIS_URL`: Redis connection URL (default: redis://127.0.0.1:6379/0)
//! - `PRICE_CACHE_TTL_SECS`: Cached price lifetime (default: 10)
//! - `AUDIT_LOG_PATH`: Audit log file (default: crypto_requests.log)
//! - `OTEL_ENABLED`: Enable OpenTelemetry (default: false)
//! - `OTEL_EXPORTER_OTLP_ENDPOINT`: OTLP endpoint (default: <http://localhost:4317>)
//! - `OTEL_SERVICE_NAME`: Service name (default: crypto-price-gateway)
//! - `RUST_LOG`: Log level (default: info)

use std::sync::Arc;
use std::time::Duration;

use price_gateway::infrastructure::health::{HealthServer, HealthServerState};
use price_gateway::infrastructure::telemetry;
use price_gateway::{
    ApiServer, AppState, BinanceConfig, BinancePriceSource, CacheBackend, FileAuditLog,
    GatewayConfig, InMemoryPriceCache, PriceCachePort, PriceGateway, RedisPriceCache,
    create_router, init_metrics, join_servers, spawn_server,
};
use tokio::signal;
use tokio_util::sync::CancellationToken;

/// Graceful shutdown timeout.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    load_dotenv();

    // Initialize telemetry (tracing + optional OpenTelemetry)
    let telemetry_guard = telemetry::init();

    tracing::info!("Starting Crypto Price Gateway");

    // Initialize Prometheus metrics
    let _metrics_handle = init_metrics();

    let config = GatewayConfig::from_env()?;
    log_config(&config, telemetry_guard.is_exporting());

    let source = Arc::new(BinancePriceSource::new(&BinanceConfig::new(
        config.upstream_base_url.clone(),
    ))?);
    let audit_log = Arc::new(FileAuditLog::new(config.audit_log_path.clone()));
    tracing::info!(path = %audit_log.path().display(), "Audit log enabled");

    match config.cache.backend {
        CacheBackend::Redis => {
            let cache = Arc::new(RedisPriceCache::connect(&config.cache.redis_url).await?);
            tracing::info!("Connected to Redis");
            serve(&config, cache, source, audit_log).await;
        }
        CacheBackend::Memory => {
            tracing::warn!("Using in-memory cache; cached prices are not shared between instances");
            serve(&config, Arc::new(InMemoryPriceCache::new()), source, audit_log).await;
        }
    }

    tracing::info!("Price gateway stopped");
    Ok(())
}

/// Wire the gateway over `cache` and run both servers until shutdown.
async fn serve<C: PriceCachePort + 'static>(
    config: &GatewayConfig,
    cache: Arc<C>,
    source: Arc<BinancePriceSource>,
    audit_log: Arc<FileAuditLog>,
) {
    let shutdown_token = CancellationToken::new();

    let gateway = Arc::new(
        PriceGateway::new(Arc::clone(&cache), source, audit_log)
            .with_cache_ttl(config.cache.ttl),
    );
    let cache_ttl = gateway.cache_ttl();

    // Initialize health server
    let health_state = Arc::new(HealthServerState::new(
        env!("CARGO_PKG_VERSION").to_string(),
        config.cache.backend.as_str(),
        cache,
    ));
    let health_server = HealthServer::new(
        config.server.health_port,
        health_state,
        shutdown_token.clone(),
    );

    let api_server = ApiServer::new(
        config.server.http_port,
        create_router(AppState::new(gateway)),
        shutdown_token.clone(),
    );

    // Either server failing stops the process
    let tasks = vec![
        spawn_server("health", health_server.run(), shutdown_token.clone()),
        spawn_server("api", api_server.run(), shutdown_token.clone()),
    ];

    tracing::info!(
        cache_ttl_secs = cache_ttl.as_secs(),
        "Price gateway ready"
    );

    await_shutdown(shutdown_token).await;

    let drained = tokio::time::timeout(SHUTDOWN_TIMEOUT, join_servers(tasks)).await;
    if drained.is_err() {
        tracing::warn!("Shutdown timeout elapsed with requests still in flight");
    }
}

/// Load .env file from current or ancestor directories.
fn load_dotenv() {
    if dotenvy::dotenv().is_err() {
        load_dotenv_from_ancestors();
    }
}

/// Log the parsed configuration.
fn log_config(config: &GatewayConfig, otel_exporting: bool) {
    tracing::info!(
        http_port = config.server.http_port,
        health_port = config.server.health_port,
        cache_backend = config.cache.backend.as_str(),
        cache_ttl_secs = config.cache.ttl.as_secs(),
        otel_exporting,
        "Configuration loaded"
    );
    tracing::debug!(
        upstream = %config.upstream_base_url,
        audit_log = %config.audit_log_path.display(),
        "Endpoints"
    );
}

/// Load .env file from any ancestor directory.
fn load_dotenv_from_ancestors() {
    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Wait for shutdown signal (SIGTERM, SIGINT) or an internal cancel.
#[allow(clippy::expect_used)]
async fn await_shutdown(shutdown_token: CancellationToken) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
        () = shutdown_token.cancelled() => {
            tracing::warn!("Internal failure, initiating shutdown");
        }
    }

    shutdown_token.cancel();

    tracing::info!(
        timeout_secs = SHUTDOWN_TIMEOUT.as_secs(),
        "Graceful shutdown started"
    );
}
