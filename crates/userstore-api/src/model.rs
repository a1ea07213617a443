//! User record types shared by the accessor, the lookup guard and the routes

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use userstore_db::UserParams;

pub use userstore_db::{InsertedUser, UpdateCounts, UserRow as User};

/// Accepted values for [`UserFields::gender`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Others,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Others];

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Others => "others",
        }
    }
}

impl FromStr for Gender {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gender::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or(())
    }
}

/// Request body for creating or replacing a user.
///
/// Missing fields decode to empty values so that they are reported by
/// validation rather than rejected by the JSON decoder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserFields {
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub age: i32,
}

impl UserFields {
    pub fn to_params(&self) -> UserParams {
        UserParams {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            gender: self.gender.clone(),
            age: self.age,
        }
    }
}

/// Response for `POST /users`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedResponse {
    pub inserted_id: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<InsertedUser> for CreatedResponse {
    fn from(inserted: InsertedUser) -> Self {
        Self {
            inserted_id: inserted.id.to_string(),
            created_at: inserted.created_at,
        }
    }
}

/// Response for `PUT /users/{id}`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedResponse {
    pub matched_count: i64,
    pub modified_count: i64,
}

impl From<UpdateCounts> for UpdatedResponse {
    fn from(counts: UpdateCounts) -> Self {
        Self {
            matched_count: counts.matched,
            modified_count: counts.modified,
        }
    }
}

/// Response for `DELETE /users/{id}`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedResponse {
    pub deleted_count: u64,
}
