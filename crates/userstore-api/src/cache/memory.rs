//! In-process cache store backed by moka

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::future::Cache;
use moka::Expiry;

use super::CacheStore;
use crate::error::CacheError;

#[derive(Clone)]
struct Entry {
    bytes: Arc<[u8]>,
    ttl: Duration,
}

/// Expires every entry `ttl` after its latest write
struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Bounded in-memory cache store, used when no Redis URL is configured
pub struct MemoryCacheStore {
    cache: Cache<String, Entry>,
}

impl MemoryCacheStore {
    pub fn new(max_entries: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .expire_after(PerEntryTtl)
            .build();
        Self { cache }
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self.cache.get(key).await.map(|e| e.bytes.to_vec()))
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError> {
        let entry = Entry {
            bytes: value.into(),
            ttl,
        };
        self.cache.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.cache.invalidate(key).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_returns_what_was_set() {
        let store = MemoryCacheStore::new(100);
        store
            .set("a", b"payload".to_vec(), Duration::from_secs(30))
            .await
            .unwrap();

        assert_eq!(store.get("a").await.unwrap(), Some(b"payload".to_vec()));
        assert_eq!(store.get("b").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_entry_expires_after_ttl() {
        let store = MemoryCacheStore::new(100);
        store
            .set("short", b"x".to_vec(), Duration::from_millis(50))
            .await
            .unwrap();
        store
            .set("long", b"y".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();

        std::thread::sleep(Duration::from_millis(150));

        assert_eq!(store.get("short").await.unwrap(), None);
        assert_eq!(store.get("long").await.unwrap(), Some(b"y".to_vec()));
    }

    #[tokio::test]
    async fn test_overwrite_resets_ttl() {
        let store = MemoryCacheStore::new(100);
        store
            .set("k", b"old".to_vec(), Duration::from_millis(50))
            .await
            .unwrap();
        store
            .set("k", b"new".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();

        std::thread::sleep(Duration::from_millis(150));

        assert_eq!(store.get("k").await.unwrap(), Some(b"new".to_vec()));
    }

    #[tokio::test]
    async fn test_delete_removes_entry() {
        let store = MemoryCacheStore::new(100);
        store
            .set("k", b"v".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();
        store.delete("k").await.unwrap();
        store.delete("missing").await.unwrap();

        assert_eq!(store.get("k").await.unwrap(), None);
    }
}
