//! Health Check and Metrics Endpoint
//!
//! HTTP endpoint for health checks, cache reachability, and Prometheus
//! metrics. Runs on its own port, separate from the price API.
//!
//! # Endpoints
//!
//! - `GET /health` - Returns JSON health status
//! - `GET /healthz` - Liveness probe (simple OK)
//! - `GET /readyz` - Readiness probe (pings the cache store)
//! - `GET /metrics` - Prometheus metrics in text format

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::application::ports::PriceCachePort;
use crate::infrastructure::metrics::get_metrics_handle;

// =============================================================================
// Health Response Types
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Overall status: "healthy" or "unhealthy".
    pub status: HealthStatus,
    /// Gateway version.
    pub version: String,
    /// Server uptime in seconds.
    pub uptime_secs: u64,
    /// Current time.
    pub current_time: DateTime<Utc>,
    /// Cache store status.
    pub cache: CacheStatus,
}

/// Overall health status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Cache store reachable.
    Healthy,
    /// Cache store unreachable; every lookup would fail.
    Unhealthy,
}

/// Cache store status.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatus {
    /// Backend name.
    pub backend: String,
    /// Whether the last ping succeeded.
    pub reachable: bool,
    /// Ping failure, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// =============================================================================
// Health Server State
// =============================================================================

/// Shared state for the health server.
pub struct HealthServerState<C: PriceCachePort> {
    version: String,
    started_at: Instant,
    cache_backend: String,
    cache: Arc<C>,
}

impl<C: PriceCachePort> HealthServerState<C> {
    /// Create new health server state.
    #[must_use]
    pub fn new(version: String, cache_backend: impl Into<String>, cache: Arc<C>) -> Self {
        Self {
            version,
            started_at: Instant::now(),
            cache_backend: cache_backend.into(),
            cache,
        }
    }
}

// =============================================================================
// Health Server
// =============================================================================

/// Health check HTTP server.
pub struct HealthServer<C: PriceCachePort> {
    port: u16,
    state: Arc<HealthServerState<C>>,
    cancel: CancellationToken,
}

impl<C: PriceCachePort + 'static> HealthServer<C> {
    /// Create a new health server.
    #[must_use]
    pub const fn new(
        port: u16,
        state: Arc<HealthServerState<C>>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            port,
            state,
            cancel,
        }
    }

    /// Build the health router.
    pub fn router(state: Arc<HealthServerState<C>>) -> Router {
        Router::new()
            .route("/health", get(health_handler::<C>))
            .route("/healthz", get(liveness_handler))
            .route("/readyz", get(readiness_handler::<C>))
            .route("/metrics", get(metrics_handler))
            .with_state(state)
    }

    /// Run the health server until cancelled.
    ///
    /// # Errors
    ///
    /// Returns `HealthServerError` if binding fails or the HTTP server
    /// encounters a fatal error while running.
    pub async fn run(self) -> Result<(), HealthServerError> {
        let app = Self::router(self.state);

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| HealthServerError::BindFailed(self.port, e.to_string()))?;

        tracing::info!(port = self.port, "Health server listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(self.cancel.cancelled_owned())
            .await
            .map_err(|e| HealthServerError::ServerFailed(e.to_string()))?;

        tracing::info!("Health server stopped");
        Ok(())
    }
}

// =============================================================================
// HTTP Handlers
// =============================================================================

async fn health_handler<C: PriceCachePort>(
    State(state): State<Arc<HealthServerState<C>>>,
) -> impl IntoResponse {
    let response = build_health_response(&state).await;
    let status_code = match response.status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status_code, Json(response))
}

async fn liveness_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

async fn readiness_handler<C: PriceCachePort>(
    State(state): State<Arc<HealthServerState<C>>>,
) -> impl IntoResponse {
    if state.cache.ping().await.is_ok() {
        (StatusCode::OK, "READY")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "NOT READY")
    }
}

async fn metrics_handler() -> impl IntoResponse {
    get_metrics_handle().map_or_else(
        || {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                [("content-type", "text/plain")],
                "Metrics not initialized".to_string(),
            )
        },
        |handle| {
            (
                StatusCode::OK,
                [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
                handle.render(),
            )
        },
    )
}

async fn build_health_response<C: PriceCachePort>(state: &HealthServerState<C>) -> HealthResponse {
    let ping = state.cache.ping().await;
    let cache = CacheStatus {
        backend: state.cache_backend.clone(),
        reachable: ping.is_ok(),
        error: ping.err().map(|e| e.to_string()),
    };

    HealthResponse {
        status: determine_health_status(&cache),
        version: state.version.clone(),
        uptime_secs: state.started_at.elapsed().as_secs(),
        current_time: Utc::now(),
        cache,
    }
}

const fn determine_health_status(cache: &CacheStatus) -> HealthStatus {
    if cache.reachable {
        HealthStatus::Healthy
    } else {
        HealthStatus::Unhealthy
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Health server errors.
#[derive(Debug, thiserror::Error)]
pub enum HealthServerError {
    /// Failed to bind to port.
    #[error("failed to bind to port {0}: {1}")]
    BindFailed(u16, String),

    /// Server error.
    #[error("server error: {0}")]
    ServerFailed(String),
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use super::*;
    use crate::application::ports::CacheError;
    use crate::infrastructure::cache::InMemoryPriceCache;

    struct UnreachableCache;

    #[async_trait]
    impl PriceCachePort for UnreachableCache {
        async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
            Err(unreachable_error())
        }

        async fn set_with_expiry(
            &self,
            _key: &str,
            _value: &str,
            _ttl: Duration,
        ) -> Result<(), CacheError> {
            Err(unreachable_error())
        }

        async fn ping(&self) -> Result<(), CacheError> {
            Err(unreachable_error())
        }
    }

    fn unreachable_error() -> CacheError {
        CacheError::ConnectionError {
            message: "connection refused".to_string(),
        }
    }

    #[test]
    fn health_status_serialization() {
        assert_eq!(
            serde_json::to_string(&HealthStatus::Healthy).unwrap(),
            "\"healthy\""
        );
        assert_eq!(
            serde_json::to_string(&HealthStatus::Unhealthy).unwrap(),
            "\"unhealthy\""
        );
    }

    #[tokio::test]
    async fn health_reports_reachable_cache() {
        let state = HealthServerState::new(
            "test".to_string(),
            "memory",
            Arc::new(InMemoryPriceCache::new()),
        );

        let response = build_health_response(&state).await;
        assert_eq!(response.status, HealthStatus::Healthy);
        assert!(response.cache.reachable);
        assert_eq!(response.cache.backend, "memory");
        assert!(response.cache.error.is_none());
    }

    #[tokio::test]
    async fn health_reports_unreachable_cache() {
        let state = HealthServerState::new("test".to_string(), "redis", Arc::new(UnreachableCache));

        let response = build_health_response(&state).await;
        assert_eq!(response.status, HealthStatus::Unhealthy);
        assert!(!response.cache.reachable);
        assert!(response.cache.error.unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn readyz_reflects_cache() {
        let ready = HealthServer::router(Arc::new(HealthServerState::new(
            "test".to_string(),
            "memory",
            Arc::new(InMemoryPriceCache::new()),
        )));
        let response = ready
            .oneshot(Request::get("/readyz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let not_ready = HealthServer::router(Arc::new(HealthServerState::new(
            "test".to_string(),
            "redis",
            Arc::new(UnreachableCache),
        )));
        let response = not_ready
            .oneshot(Request::get("/readyz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn liveness_always_ok() {
        let router = HealthServer::router(Arc::new(HealthServerState::new(
            "test".to_string(),
            "redis",
            Arc::new(UnreachableCache),
        )));
        let response = router
            .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
