//! HTTP Controller (Driver Adapter)
//!
//! Axum router that delegates to the price gateway use case.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use tracing::Instrument;
use uuid::Uuid;

use crate::application::ports::{AuditLogPort, PriceCachePort, PriceSourcePort};
use crate::application::services::PriceGateway;
use crate::domain::quote::PriceQuote;
use crate::infrastructure::metrics::{self, RequestOutcome};

use super::response::ApiError;

/// Application state shared across handlers.
pub struct AppState<C, S, L>
where
    C: PriceCachePort,
    S: PriceSourcePort,
    L: AuditLogPort,
{
    /// Price lookup use case.
    pub gateway: Arc<PriceGateway<C, S, L>>,
}

impl<C, S, L> AppState<C, S, L>
where
    C: PriceCachePort,
    S: PriceSourcePort,
    L: AuditLogPort,
{
    /// Create handler state around a gateway.
    pub const fn new(gateway: Arc<PriceGateway<C, S, L>>) -> Self {
        Self { gateway }
    }
}

impl<C, S, L> Clone for AppState<C, S, L>
where
    C: PriceCachePort,
    S: PriceSourcePort,
    L: AuditLogPort,
{
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
        }
    }
}

/// Create the HTTP router with all endpoints.
pub fn create_router<C, S, L>(state: AppState<C, S, L>) -> Router
where
    C: PriceCachePort + 'static,
    S: PriceSourcePort + 'static,
    L: AuditLogPort + 'static,
{
    Router::new()
        .route("/crypto/{symbol}", get(get_crypto_price::<C, S, L>))
        .with_state(state)
}

/// `GET /crypto/{symbol}`.
async fn get_crypto_price<C, S, L>(
    State(state): State<AppState<C, S, L>>,
    Path(symbol): Path<String>,
) -> Result<Json<PriceQuote>, ApiError>
where
    C: PriceCachePort,
    S: PriceSourcePort,
    L: AuditLogPort,
{
    let span = tracing::info_span!(
        "get_crypto_price",
        request_id = %Uuid::new_v4(),
        symbol = %symbol,
    );

    let result = state.gateway.get_price(&symbol).instrument(span).await;
    metrics::record_request(RequestOutcome::of(&result));

    Ok(Json(result?))
}
