use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, ConnectionAddr, ConnectionInfo, ErrorKind, RedisError};
use tokio::sync::OnceCell;

use visitd_core::counter::{CounterKey, CounterStore};
use visitd_core::error::{Result, VisitError};

use crate::config::StoreSection;

const CONNECT_BACKOFF_BASE: u64 = 2;
const CONNECT_BACKOFF_FACTOR_MS: u64 = 100;
const CONNECT_RETRIES: usize = 0;

/// Redis-backed counter.
///
/// The connection is established on first use and then shared: a store that
/// is down at process start does not prevent the service from booting, and a
/// failed connect is attempted again on the next call. Each connect is a
/// single attempt; the manager's own backoff retries are disabled.
pub struct RedisStore {
    client: Client,
    conn: OnceCell<ConnectionManager>,
}

impl RedisStore {
    pub fn new(cfg: &StoreSection) -> Result<Self> {
        let info = ConnectionInfo {
            addr: ConnectionAddr::Tcp(cfg.host.clone(), cfg.port),
            redis: Default::default(),
        };
        let client = Client::open(info)
            .map_err(|e| VisitError::BadConfig(format!("redis client: {e}")))?;
        Ok(Self {
            client,
            conn: OnceCell::new(),
        })
    }

    async fn conn(&self) -> Result<ConnectionManager> {
        let conn = self
            .conn
            .get_or_try_init(|| async {
                tracing::info!("connecting to redis");
                ConnectionManager::new_with_backoff(
                    self.client.clone(),
                    CONNECT_BACKOFF_BASE,
                    CONNECT_BACKOFF_FACTOR_MS,
                    CONNECT_RETRIES,
                )
                .await
            })
            .await
            .map_err(|e| VisitError::StoreUnavailable(format!("connect: {e}")))?;
        Ok(conn.clone())
    }
}

#[async_trait]
impl CounterStore for RedisStore {
    fn backend(&self) -> &'static str {
        "redis"
    }

    async fn incr(&self, key: &CounterKey) -> Result<i64> {
        let mut conn = self.conn().await?;
        conn.incr(key.as_str(), 1_i64)
            .await
            .map_err(|e| map_redis_err(key, e))
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.conn().await?;
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| VisitError::StoreUnavailable(e.to_string()))?;
        Ok(())
    }
}

/// Reply errors mean the key holds something `INCR` refuses; everything else
/// is a transport problem.
fn map_redis_err(key: &CounterKey, e: RedisError) -> VisitError {
    match e.kind() {
        ErrorKind::ResponseError | ErrorKind::TypeError | ErrorKind::ExtensionError => {
            VisitError::invalid_counter(key.as_str(), e.to_string())
        }
        _ => VisitError::StoreUnavailable(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_error_maps_to_invalid_counter() {
        let key = CounterKey::default();
        let e = RedisError::from((ErrorKind::ResponseError, "value is not an integer or out of range"));
        assert_eq!(map_redis_err(&key, e).client_code().as_str(), "INVALID_COUNTER");
    }

    #[test]
    fn io_error_maps_to_store_unavailable() {
        let key = CounterKey::default();
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let e = RedisError::from(io);
        assert_eq!(map_redis_err(&key, e).client_code().as_str(), "STORE_UNAVAILABLE");
    }
}
