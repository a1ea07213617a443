use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// User row returned from SELECT queries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub age: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Field set written by inserts and full replaces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserParams {
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub age: i32,
}

/// Store-assigned identifier and insertion metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct InsertedUser {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Counts reported by a replace.
///
/// `matched` is the number of rows with the requested id, `modified` the
/// number whose field set actually changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UpdateCounts {
    pub matched: i64,
    pub modified: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_user_row_json_round_trip_keeps_timestamps() {
        let row = UserRow {
            id: Uuid::nil(),
            first_name: "ken".to_string(),
            last_name: "lam".to_string(),
            gender: "male".to_string(),
            age: 2,
            created_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 6, 2, 8, 30, 0).unwrap(),
        };

        let json = serde_json::to_string(&row).unwrap();
        let back: UserRow = serde_json::from_str(&json).unwrap();
        assert_eq!(back, row);
        assert_eq!(serde_json::to_string(&back).unwrap(), json);
    }

    #[test]
    fn test_update_counts_default_is_zero() {
        let counts = UpdateCounts::default();
        assert_eq!(counts.matched, 0);
        assert_eq!(counts.modified, 0);
    }
}
