//! In-memory doubles of the record and cache stores, with call counters and
//! switchable failures.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::time::Instant;
use uuid::Uuid;

use crate::cache::CacheStore;
use crate::error::{CacheError, StoreError};
use crate::model::{InsertedUser, UpdateCounts, User, UserFields};
use crate::store::RecordStore;

pub fn sam() -> UserFields {
    UserFields {
        first_name: "sam".to_string(),
        last_name: "chan".to_string(),
        gender: "male".to_string(),
        age: 20,
    }
}

/// Whether a stored row already holds exactly these fields
fn holds_fields(user: &User, fields: &UserFields) -> bool {
    fields.first_name == user.first_name
        && fields.last_name == user.last_name
        && fields.gender == user.gender
        && fields.age == user.age
}

#[derive(Default)]
pub struct MemoryRecordStore {
    users: Mutex<HashMap<Uuid, User>>,
    calls: AtomicUsize,
    failing: AtomicBool,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of trait calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn enter(&self) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Timeout(Duration::ZERO));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn count(&self) -> Result<i64, StoreError> {
        self.enter()?;
        Ok(self.users.lock().unwrap().len() as i64)
    }

    async fn insert(&self, fields: &UserFields) -> Result<InsertedUser, StoreError> {
        self.enter()?;
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            first_name: fields.first_name.clone(),
            last_name: fields.last_name.clone(),
            gender: fields.gender.clone(),
            age: fields.age,
            created_at: now,
            updated_at: now,
        };
        let inserted = InsertedUser {
            id: user.id,
            created_at: now,
        };
        self.users.lock().unwrap().insert(user.id, user);
        Ok(inserted)
    }

    async fn find_one(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        self.enter()?;
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn update_one(&self, id: Uuid, fields: &UserFields) -> Result<UpdateCounts, StoreError> {
        self.enter()?;
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.get_mut(&id) else {
            return Ok(UpdateCounts::default());
        };
        if holds_fields(user, fields) {
            return Ok(UpdateCounts {
                matched: 1,
                modified: 0,
            });
        }
        user.first_name = fields.first_name.clone();
        user.last_name = fields.last_name.clone();
        user.gender = fields.gender.clone();
        user.age = fields.age;
        user.updated_at = Utc::now();
        Ok(UpdateCounts {
            matched: 1,
            modified: 1,
        })
    }

    async fn delete_one(&self, id: Uuid) -> Result<u64, StoreError> {
        self.enter()?;
        Ok(self.users.lock().unwrap().remove(&id).map_or(0, |_| 1))
    }
}

/// Cache double on tokio's clock, so tests can pause and advance time
#[derive(Default)]
pub struct FakeCacheStore {
    entries: Mutex<HashMap<String, (Vec<u8>, Instant)>>,
    gets: AtomicUsize,
    sets: AtomicUsize,
    last_ttl: Mutex<Option<Duration>>,
    failing_reads: AtomicBool,
    failing_writes: AtomicBool,
    failing_deletes: AtomicBool,
}

impl FakeCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn sets(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }

    pub fn last_ttl(&self) -> Option<Duration> {
        *self.last_ttl.lock().unwrap()
    }

    /// Current payload for `key`, ignoring expiry
    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.lock().unwrap().get(key).map(|(v, _)| v.clone())
    }

    /// Store a payload without counting it as a write
    pub fn put_raw(&self, key: &str, value: Vec<u8>, ttl: Duration) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value, Instant::now() + ttl));
    }

    pub fn set_failing_reads(&self, failing: bool) {
        self.failing_reads.store(failing, Ordering::SeqCst);
    }

    pub fn set_failing_writes(&self, failing: bool) {
        self.failing_writes.store(failing, Ordering::SeqCst);
    }

    pub fn set_failing_deletes(&self, failing: bool) {
        self.failing_deletes.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl CacheStore for FakeCacheStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        if self.failing_reads.load(Ordering::SeqCst) {
            return Err(CacheError::Timeout(Duration::ZERO));
        }
        let entries = self.entries.lock().unwrap();
        Ok(entries
            .get(key)
            .filter(|(_, expires_at)| Instant::now() < *expires_at)
            .map(|(v, _)| v.clone()))
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        if self.failing_writes.load(Ordering::SeqCst) {
            return Err(CacheError::Timeout(Duration::ZERO));
        }
        *self.last_ttl.lock().unwrap() = Some(ttl);
        self.put_raw(key, value, ttl);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        if self.failing_deletes.load(Ordering::SeqCst) {
            return Err(CacheError::Timeout(Duration::ZERO));
        }
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}
