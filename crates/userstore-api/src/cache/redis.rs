//! Redis cache store

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::info;

use super::CacheStore;
use crate::error::CacheError;

/// Cache store over a shared, auto-reconnecting Redis connection.
///
/// Entries are written with `PSETEX`, so expiry is enforced by Redis itself.
#[derive(Clone)]
pub struct RedisCacheStore {
    conn: ConnectionManager,
    call_timeout: Duration,
}

impl RedisCacheStore {
    /// Connect to Redis; both the connect and every later call are bounded by `call_timeout`
    pub async fn connect(url: &str, call_timeout: Duration) -> Result<Self, CacheError> {
        let client = redis::Client::open(url)?;
        let conn = tokio::time::timeout(call_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| CacheError::Timeout(call_timeout))??;
        info!("Connected to Redis cache");
        Ok(Self { conn, call_timeout })
    }

    async fn bounded<T, F>(&self, fut: F) -> Result<T, CacheError>
    where
        F: Future<Output = redis::RedisResult<T>>,
    {
        tokio::time::timeout(self.call_timeout, fut)
            .await
            .map_err(|_| CacheError::Timeout(self.call_timeout))?
            .map_err(CacheError::from)
    }
}

/// Redis rejects a zero expiry
fn ttl_millis(ttl: Duration) -> u64 {
    (ttl.as_millis() as u64).max(1)
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let mut conn = self.conn.clone();
        self.bounded(conn.get::<_, Option<Vec<u8>>>(key)).await
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        self.bounded(conn.pset_ex::<_, _, ()>(key, value, ttl_millis(ttl)))
            .await
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        self.bounded(conn.del::<_, ()>(key)).await
    }
}
