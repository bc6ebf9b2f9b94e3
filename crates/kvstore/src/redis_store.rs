//! Redis-backed store used in production.

use async_trait::async_trait;
use bytes::Bytes;
use redis::{aio::MultiplexedConnection, AsyncCommands, Client};
use tracing::debug;

use risk_common::{RiskError, RiskResult};

use crate::store::KvStore;

/// Redis key-value store client.
///
/// The multiplexed connection is cheap to clone; each operation clones it
/// so the trait can take `&self` and callers can share one store.
#[derive(Clone)]
pub struct RedisStore {
    conn: MultiplexedConnection,
}

impl RedisStore {
    /// Connect to Redis.
    pub async fn connect(redis_url: &str) -> RiskResult<Self> {
        let client = Client::open(redis_url)
            .map_err(|e| RiskError::Store(format!("Redis connection failed: {}", e)))?;

        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| RiskError::Store(format!("Redis connection failed: {}", e)))?;

        debug!(url = redis_url, "connected to key-value store");
        Ok(Self { conn })
    }

    /// Delete every key a job owns. Returns the number of keys removed.
    pub async fn sweep_job(&self, pattern: &str) -> RiskResult<u64> {
        let mut conn = self.conn.clone();

        let keys: Vec<String> = redis::cmd("KEYS")
            .arg(pattern)
            .query_async(&mut conn)
            .await
            .map_err(|e| RiskError::Store(format!("Pattern search failed: {}", e)))?;

        if keys.is_empty() {
            return Ok(0);
        }

        let count = keys.len() as u64;
        for key in keys {
            let _: () = conn
                .del(&key)
                .await
                .map_err(|e| RiskError::Store(format!("Delete failed: {}", e)))?;
        }

        Ok(count)
    }
}

#[async_trait]
impl KvStore for RedisStore {
    async fn get(&self, key: &str) -> RiskResult<Option<Bytes>> {
        let mut conn = self.conn.clone();
        let result: Option<Vec<u8>> = conn
            .get(key)
            .await
            .map_err(|e| RiskError::Store(format!("Get failed: {}", e)))?;
        Ok(result.map(Bytes::from))
    }

    async fn set(&self, key: &str, value: &[u8]) -> RiskResult<()> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .set(key, value)
            .await
            .map_err(|e| RiskError::Store(format!("Set failed: {}", e)))?;
        Ok(())
    }

    async fn get_list(&self, key: &str) -> RiskResult<Vec<Bytes>> {
        let mut conn = self.conn.clone();
        let items: Vec<Vec<u8>> = conn
            .lrange(key, 0, -1)
            .await
            .map_err(|e| RiskError::Store(format!("List read failed: {}", e)))?;
        Ok(items.into_iter().map(Bytes::from).collect())
    }

    async fn push_list(&self, key: &str, value: &[u8]) -> RiskResult<()> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .rpush(key, value)
            .await
            .map_err(|e| RiskError::Store(format!("List push failed: {}", e)))?;
        Ok(())
    }
}
