//! Binance Spot Price Adapter
//!
//! Implements `PriceSourcePort` against Binance's public ticker endpoint:
//!
//! ```text
//! GET {base_url}/api/v3/ticker/price?symbol=ETHUSDT
//! 200 {"symbol":"ETHUSDT","price":"3500.12000000"}
//! ```
//!
//! Unknown symbols come back as a 4xx with a JSON error body, which this
//! adapter reports as `PriceSourceError::Status`.

use std::time::Instant;

use async_trait::async_trait;
use serde_json::Value;

use crate::application::ports::{PriceSourceError, PriceSourcePort};
use crate::domain::quote::Symbol;
use crate::infrastructure::metrics;

/// Production REST base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.binance.com";

const TICKER_PRICE_PATH: &str = "/api/v3/ticker/price";

/// Binance adapter configuration.
#[derive(Debug, Clone)]
pub struct BinanceConfig {
    /// REST base URL without a trailing slash.
    pub base_url: String,
}

impl BinanceConfig {
    /// Create a configuration for the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Full ticker price endpoint URL.
    #[must_use]
    pub fn ticker_price_url(&self) -> String {
        format!("{}{TICKER_PRICE_PATH}", self.base_url)
    }
}

impl Default for BinanceConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Binance spot price source.
#[derive(Debug, Clone)]
pub struct BinancePriceSource {
    client: reqwest::Client,
    ticker_price_url: String,
}

impl BinancePriceSource {
    /// Create a new adapter.
    ///
    /// No request timeout is set beyond the reqwest defaults.
    ///
    /// # Errors
    ///
    /// Returns `PriceSourceError::Network` if the HTTP client cannot be built.
    pub fn new(config: &BinanceConfig) -> Result<Self, PriceSourceError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PriceSourceError::Network {
                message: e.to_string(),
            })?;

        Ok(Self::with_client(client, config))
    }

    /// Create an adapter around an existing HTTP client.
    #[must_use]
    pub fn with_client(client: reqwest::Client, config: &BinanceConfig) -> Self {
        Self {
            client,
            ticker_price_url: config.ticker_price_url(),
        }
    }

    async fn request_ticker(&self, symbol: &Symbol) -> Result<Value, PriceSourceError> {
        let response = self
            .client
            .get(&self.ticker_price_url)
            .query(&[("symbol", symbol.as_str())])
            .send()
            .await
            .map_err(|e| PriceSourceError::Network {
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PriceSourceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| PriceSourceError::InvalidResponse {
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl PriceSourcePort for BinancePriceSource {
    fn name(&self) -> &str {
        "Binance"
    }

    async fn fetch_price(&self, symbol: &Symbol) -> Result<Option<String>, PriceSourceError> {
        let started = Instant::now();
        let result = self.request_ticker(symbol).await;
        metrics::record_upstream_duration(result.is_ok(), started.elapsed());

        Ok(extract_price(&result?))
    }
}

/// Pull the `price` field out of a ticker body.
///
/// Binance sends prices as strings; a bare JSON number is accepted too.
fn extract_price(body: &Value) -> Option<String> {
    match body.get("price")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn source_for(server: &MockServer) -> BinancePriceSource {
        BinancePriceSource::new(&BinanceConfig::new(server.uri())).unwrap()
    }

    #[test]
    fn config_strips_trailing_slash() {
        let config = BinanceConfig::new("https://api.binance.com/");
        assert_eq!(
            config.ticker_price_url(),
            "https://api.binance.com/api/v3/ticker/price"
        );
        assert_eq!(BinanceConfig::default().base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn extract_price_variants() {
        assert_eq!(
            extract_price(&json!({"symbol": "BTCUSDT", "price": "65000.01"})).as_deref(),
            Some("65000.01")
        );
        assert_eq!(extract_price(&json!({"price": 1.5})).as_deref(), Some("1.5"));
        assert_eq!(extract_price(&json!({"symbol": "BTCUSDT"})), None);
        assert_eq!(extract_price(&json!({"price": null})), None);
        assert_eq!(extract_price(&json!([1, 2])), None);
    }

    #[tokio::test]
    async fn fetch_price_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/ticker/price"))
            .and(query_param("symbol", "ETHUSDT"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"symbol": "ETHUSDT", "price": "3500.12"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let price = source_for(&server)
            .fetch_price(&Symbol::new("ethusdt"))
            .await
            .unwrap();

        assert_eq!(price.as_deref(), Some("3500.12"));
    }

    #[tokio::test]
    async fn fetch_price_missing_field() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/ticker/price"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"symbol": "ETHUSDT"})))
            .mount(&server)
            .await;

        let price = source_for(&server)
            .fetch_price(&Symbol::new("ETHUSDT"))
            .await
            .unwrap();

        assert_eq!(price, None);
    }

    #[tokio::test]
    async fn fetch_price_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/ticker/price"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({"code": -1121, "msg": "Invalid symbol."})),
            )
            .mount(&server)
            .await;

        let err = source_for(&server)
            .fetch_price(&Symbol::new("NOPE"))
            .await
            .unwrap_err();

        match err {
            PriceSourceError::Status { status, body } => {
                assert_eq!(status, 400);
                assert!(body.contains("Invalid symbol."));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn fetch_price_invalid_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/ticker/price"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let err = source_for(&server)
            .fetch_price(&Symbol::new("BTCUSDT"))
            .await
            .unwrap_err();

        assert!(matches!(err, PriceSourceError::InvalidResponse { .. }));
    }

    #[tokio::test]
    async fn fetch_price_connection_refused() {
        // Nothing listens on port 1.
        let source = BinancePriceSource::new(&BinanceConfig::new("http://127.0.0.1:1")).unwrap();
        let err = source
            .fetch_price(&Symbol::new("BTCUSDT"))
            .await
            .unwrap_err();

        assert!(matches!(err, PriceSourceError::Network { .. }));
    }
}
