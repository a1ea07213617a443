//! Record store seam.
//!
//! [`UserAccessor`](crate::accessor::UserAccessor) only sees the
//! [`RecordStore`] trait; [`PgRecordStore`] backs it with the shared
//! `userstore-db` queries.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgPool;
use uuid::Uuid;

use crate::error::StoreError;
use crate::model::{InsertedUser, UpdateCounts, User, UserFields};

/// Identifier-keyed persistence for user records
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn count(&self) -> Result<i64, StoreError>;

    async fn insert(&self, fields: &UserFields) -> Result<InsertedUser, StoreError>;

    /// `Ok(None)` when no record has this id
    async fn find_one(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Full field-set replace
    async fn update_one(&self, id: Uuid, fields: &UserFields) -> Result<UpdateCounts, StoreError>;

    /// Number of records removed (0 when nothing matched)
    async fn delete_one(&self, id: Uuid) -> Result<u64, StoreError>;
}

/// PostgreSQL record store with a per-call time bound
pub struct PgRecordStore {
    pool: PgPool,
    call_timeout: Duration,
}

impl PgRecordStore {
    pub fn new(pool: PgPool, call_timeout: Duration) -> Self {
        Self { pool, call_timeout }
    }

    async fn bounded<T, F>(&self, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        tokio::time::timeout(self.call_timeout, fut)
            .await
            .map_err(|_| StoreError::Timeout(self.call_timeout))?
            .map_err(StoreError::from)
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn count(&self) -> Result<i64, StoreError> {
        self.bounded(userstore_db::users::count(&self.pool)).await
    }

    async fn insert(&self, fields: &UserFields) -> Result<InsertedUser, StoreError> {
        let params = fields.to_params();
        self.bounded(userstore_db::users::insert(&self.pool, &params))
            .await
    }

    async fn find_one(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        self.bounded(userstore_db::users::get(&self.pool, id)).await
    }

    async fn update_one(&self, id: Uuid, fields: &UserFields) -> Result<UpdateCounts, StoreError> {
        let params = fields.to_params();
        self.bounded(userstore_db::users::replace(&self.pool, id, &params))
            .await
    }

    async fn delete_one(&self, id: Uuid) -> Result<u64, StoreError> {
        self.bounded(userstore_db::users::delete(&self.pool, id)).await
    }
}
