//! Validated CRUD for user records.
//!
//! Identifier parsing and field validation run before the record store is
//! touched, so malformed requests never reach it.

use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::AccessError;
use crate::model::{InsertedUser, UpdateCounts, User, UserFields};
use crate::store::RecordStore;
use crate::validation::validate_user;

/// Parse a user identifier token
pub fn parse_identifier(raw: &str) -> Result<Uuid, AccessError> {
    Uuid::parse_str(raw).map_err(|_| AccessError::InvalidIdentifier(raw.to_string()))
}

/// Mediates every read and write of user records
pub struct UserAccessor {
    store: Arc<dyn RecordStore>,
}

impl UserAccessor {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn count(&self) -> Result<i64, AccessError> {
        self.store.count().await.map_err(|e| {
            error!(error = %e, "Failed to count users");
            AccessError::StoreUnavailable(e)
        })
    }

    pub async fn create(&self, fields: &UserFields) -> Result<InsertedUser, AccessError> {
        validate_user(fields).map_err(AccessError::Validation)?;

        let inserted = self.store.insert(fields).await.map_err(|e| {
            error!(error = %e, "Failed to insert user");
            AccessError::StoreWrite(e)
        })?;

        info!(id = %inserted.id, "Created user");
        Ok(inserted)
    }

    pub async fn get(&self, raw_id: &str) -> Result<User, AccessError> {
        let id = parse_identifier(raw_id)?;
        self.find(id).await
    }

    /// Look up an already-parsed id. A failed lookup is reported as
    /// `NotFound`, same as an absent record.
    pub(crate) async fn find(&self, id: Uuid) -> Result<User, AccessError> {
        match self.store.find_one(id).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => Err(AccessError::NotFound(id.to_string())),
            Err(e) => {
                warn!(id = %id, error = %e, "User lookup failed");
                Err(AccessError::NotFound(id.to_string()))
            }
        }
    }

    /// Replace every field of a user. Fields missing from the request are
    /// written as empty values and therefore fail validation.
    pub async fn update(
        &self,
        raw_id: &str,
        fields: &UserFields,
    ) -> Result<UpdateCounts, AccessError> {
        let id = parse_identifier(raw_id)?;
        validate_user(fields).map_err(AccessError::Validation)?;

        let counts = self.store.update_one(id, fields).await.map_err(|e| {
            error!(id = %id, error = %e, "Failed to update user");
            AccessError::StoreWrite(e)
        })?;

        info!(id = %id, matched = counts.matched, modified = counts.modified, "Updated user");
        Ok(counts)
    }

    /// Delete a user. Deleting an unknown id reports a count of zero.
    pub async fn delete(&self, raw_id: &str) -> Result<u64, AccessError> {
        let id = parse_identifier(raw_id)?;

        let deleted = self.store.delete_one(id).await.map_err(|e| {
            error!(id = %id, error = %e, "Failed to delete user");
            AccessError::StoreWrite(e)
        })?;

        info!(id = %id, deleted, "Deleted user");
        Ok(deleted)
    }
}
