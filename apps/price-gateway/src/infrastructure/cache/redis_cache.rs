//! Redis price cache adapter.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::{ConnectionLike, ConnectionManager};

use crate::application::ports::{CacheError, PriceCachePort};

/// Redis-backed price cache.
///
/// In production this holds one `ConnectionManager`, which multiplexes
/// commands over a single connection and reconnects on its own. Cloning it
/// per call is cheap.
#[derive(Clone)]
pub struct RedisPriceCache<C = ConnectionManager> {
    connection: C,
}

impl RedisPriceCache<ConnectionManager> {
    /// Connect to the Redis server at `url` (for example `redis://127.0.0.1:6379/0`).
    ///
    /// # Errors
    ///
    /// Returns `CacheError::ConnectionError` if the URL is invalid or the
    /// initial connection cannot be established.
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(url).map_err(connection_error)?;
        let connection = client
            .get_connection_manager()
            .await
            .map_err(connection_error)?;

        Ok(Self { connection })
    }
}

impl<C> RedisPriceCache<C>
where
    C: ConnectionLike + Clone + Send + Sync,
{
    /// Wrap an already established connection.
    #[must_use]
    pub const fn with_connection(connection: C) -> Self {
        Self { connection }
    }
}

impl<C> std::fmt::Debug for RedisPriceCache<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisPriceCache").finish_non_exhaustive()
    }
}

#[async_trait]
impl<C> PriceCachePort for RedisPriceCache<C>
where
    C: ConnectionLike + Clone + Send + Sync,
{
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.get(key).await.map_err(command_error)?;
        Ok(value)
    }

    async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let mut conn = self.connection.clone();
        let _: () = conn
            .set_ex(key, value, ttl_secs(ttl))
            .await
            .map_err(command_error)?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), CacheError> {
        let mut conn = self.connection.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(connection_error)?;
        Ok(())
    }
}

/// `SETEX` takes whole seconds and rejects 0.
fn ttl_secs(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

fn connection_error(e: redis::RedisError) -> CacheError {
    CacheError::ConnectionError {
        message: e.to_string(),
    }
}

fn command_error(e: redis::RedisError) -> CacheError {
    if e.is_io_error() || e.is_connection_dropped() || e.is_connection_refusal() {
        connection_error(e)
    } else {
        CacheError::CommandFailed {
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use redis::{ErrorKind, RedisError, Value};
    use redis_test::{MockCmd, MockRedisConnection};

    use super::*;

    fn cache_with(commands: Vec<MockCmd>) -> RedisPriceCache<MockRedisConnection> {
        RedisPriceCache::with_connection(MockRedisConnection::new(commands))
    }

    #[tokio::test]
    async fn nil_reply_is_a_miss() {
        let cache = cache_with(vec![MockCmd::new(
            redis::cmd("GET").arg("crypto:ETHUSDT"),
            Ok(Value::Nil),
        )]);

        assert_eq!(cache.get("crypto:ETHUSDT").await.unwrap(), None);
    }

    #[tokio::test]
    async fn stored_value_is_returned() {
        let cache = cache_with(vec![MockCmd::new(
            redis::cmd("GET").arg("crypto:BTCUSDT"),
            Ok("65000.01"),
        )]);

        assert_eq!(
            cache.get("crypto:BTCUSDT").await.unwrap().as_deref(),
            Some("65000.01")
        );
    }

    #[tokio::test]
    async fn set_issues_setex_in_whole_seconds() {
        let cache = cache_with(vec![
            MockCmd::new(
                redis::cmd("SETEX").arg("crypto:ETHUSDT").arg(10).arg("3500.12"),
                Ok(Value::Okay),
            ),
            MockCmd::new(
                redis::cmd("GET").arg("crypto:ETHUSDT"),
                Ok("3500.12"),
            ),
        ]);

        cache
            .set_with_expiry("crypto:ETHUSDT", "3500.12", Duration::from_secs(10))
            .await
            .unwrap();
        assert_eq!(
            cache.get("crypto:ETHUSDT").await.unwrap().as_deref(),
            Some("3500.12")
        );
    }

    #[tokio::test]
    async fn unexpected_command_is_reported() {
        let cache = cache_with(vec![MockCmd::new(
            redis::cmd("SETEX").arg("crypto:ETHUSDT").arg(10).arg("3500.12"),
            Ok(Value::Okay),
        )]);

        let result = cache
            .set_with_expiry("crypto:ETHUSDT", "3500.12", Duration::from_secs(30))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn server_error_maps_to_command_failed() {
        let cache = cache_with(vec![MockCmd::new(
            redis::cmd("GET").arg("crypto:ETHUSDT"),
            Err::<Value, _>(RedisError::from((
                ErrorKind::TypeError,
                "WRONGTYPE",
            ))),
        )]);

        let err = cache.get("crypto:ETHUSDT").await.unwrap_err();
        assert!(matches!(err, CacheError::CommandFailed { .. }));
    }

    #[tokio::test]
    async fn ping_succeeds_on_pong() {
        let cache = cache_with(vec![MockCmd::new(redis::cmd("PING"), Ok("PONG"))]);
        assert!(cache.ping().await.is_ok());
    }

    #[test]
    fn ttl_rounds_to_whole_seconds() {
        assert_eq!(ttl_secs(Duration::from_secs(10)), 10);
        assert_eq!(ttl_secs(Duration::from_millis(10_500)), 10);
        assert_eq!(ttl_secs(Duration::from_millis(200)), 1);
    }

    #[tokio::test]
    async fn connect_rejects_invalid_url() {
        let result = RedisPriceCache::connect("not-a-redis-url").await;
        assert!(matches!(result, Err(CacheError::ConnectionError { .. })));
    }
}
