//! Cache store seam.
//!
//! Both backends hold opaque byte payloads with a per-entry time-to-live.
//! Expired entries are never returned.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::CacheError;

pub mod memory;
pub mod redis;

pub use self::memory::MemoryCacheStore;
pub use self::redis::RedisCacheStore;

/// Key-value store with per-entry expiry
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// `Ok(None)` on a miss or an expired entry
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Insert or overwrite `key`; the entry expires `ttl` after this call
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError>;

    /// Remove `key` if present
    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}
