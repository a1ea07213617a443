//! Cache-aside reads of single users.
//!
//! A cached copy is trusted until its TTL runs out. Writes do not refresh it,
//! so after an update or delete a reader can see the previous state for up to
//! one TTL window, unless invalidation on write is switched on.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use crate::accessor::{parse_identifier, UserAccessor};
use crate::cache::CacheStore;
use crate::error::{AccessError, CacheError};
use crate::model::User;

/// Where a lookup was answered from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    pub fn as_header_value(self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Lookup {
    pub user: User,
    pub status: CacheStatus,
}

/// Hit and miss counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LookupStats {
    pub hits: u64,
    pub misses: u64,
}

/// Wraps [`UserAccessor::get`] with a read-through cache
pub struct UserLookup {
    accessor: Arc<UserAccessor>,
    cache: Arc<dyn CacheStore>,
    ttl: Duration,
    invalidate_on_write: bool,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl UserLookup {
    pub fn new(accessor: Arc<UserAccessor>, cache: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self {
            accessor,
            cache,
            ttl,
            invalidate_on_write: false,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Drop the cached copy after every successful update or delete
    pub fn with_invalidate_on_write(mut self, enabled: bool) -> Self {
        self.invalidate_on_write = enabled;
        self
    }

    /// Fetch a user, answering from the cache when a readable entry exists.
    ///
    /// On a miss the user is read from the store and written back to the
    /// cache. An unreadable entry or a failed cache read counts as a miss. A
    /// failed cache write fails the whole lookup.
    pub async fn get_with_cache(&self, raw_id: &str) -> Result<Lookup, AccessError> {
        let id = parse_identifier(raw_id)?;
        let key = id.to_string();

        match self.cache.get(&key).await {
            Ok(Some(bytes)) => match serde_json::from_slice::<User>(&bytes) {
                Ok(user) => {
                    let hits = self.hits.fetch_add(1, Ordering::Relaxed) + 1;
                    debug!(key = %key, hits, "Cache hit");
                    return Ok(Lookup {
                        user,
                        status: CacheStatus::Hit,
                    });
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "Unreadable cache entry, treating as miss");
                }
            },
            Ok(None) => {}
            Err(e) => {
                warn!(key = %key, error = %e, "Cache read failed, falling back to store");
            }
        }

        let misses = self.misses.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(key = %key, misses, "Cache miss");

        let user = self.accessor.find(id).await?;

        let payload = serde_json::to_vec(&user)
            .map_err(|e| AccessError::CacheWrite(CacheError::from(e)))?;
        self.cache.set(&key, payload, self.ttl).await.map_err(|e| {
            warn!(key = %key, error = %e, "Failed to cache user");
            AccessError::CacheWrite(e)
        })?;

        Ok(Lookup {
            user,
            status: CacheStatus::Miss,
        })
    }

    /// Called after a successful update or delete of `raw_id`.
    ///
    /// No-op unless invalidation on write is enabled. Failures are logged and
    /// left to expire with the TTL.
    pub async fn after_write(&self, raw_id: &str) {
        if !self.invalidate_on_write {
            return;
        }
        let Ok(id) = parse_identifier(raw_id) else {
            return;
        };
        let key = id.to_string();
        match self.cache.delete(&key).await {
            Ok(()) => debug!(key = %key, "Invalidated cached user"),
            Err(e) => warn!(key = %key, error = %e, "Failed to invalidate cached user"),
        }
    }

    pub fn stats(&self) -> LookupStats {
        LookupStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
