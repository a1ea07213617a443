use crate::types::{InsertedUser, UpdateCounts, UserParams, UserRow};
use sqlx::PgPool;
use uuid::Uuid;

/// Count all users
pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
}

/// Insert a user, returning the generated id and insertion time
pub async fn insert(pool: &PgPool, p: &UserParams) -> Result<InsertedUser, sqlx::Error> {
    sqlx::query_as::<_, InsertedUser>(
        r#"
        INSERT INTO users (first_name, last_name, gender, age)
        VALUES ($1, $2, $3, $4)
        RETURNING id, created_at
        "#,
    )
    .bind(&p.first_name)
    .bind(&p.last_name)
    .bind(&p.gender)
    .bind(p.age)
    .fetch_one(pool)
    .await
}

/// Get a single user by id
pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, first_name, last_name, gender, age, created_at, updated_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Replace every field of a user.
///
/// Rows whose fields already equal the new values count as matched but not
/// modified, and keep their `updated_at`.
pub async fn replace(pool: &PgPool, id: Uuid, p: &UserParams) -> Result<UpdateCounts, sqlx::Error> {
    sqlx::query_as::<_, UpdateCounts>(
        r#"
        WITH target AS (
            SELECT id, first_name, last_name, gender, age
            FROM users
            WHERE id = $1
            FOR UPDATE
        ),
        changed AS (
            UPDATE users u SET
                first_name = $2,
                last_name = $3,
                gender = $4,
                age = $5,
                updated_at = NOW()
            FROM target t
            WHERE u.id = t.id
              AND (t.first_name, t.last_name, t.gender, t.age)
                  IS DISTINCT FROM ($2::text, $3::text, $4::text, $5::int4)
            RETURNING u.id
        )
        SELECT
            (SELECT COUNT(*) FROM target) AS matched,
            (SELECT COUNT(*) FROM changed) AS modified
        "#,
    )
    .bind(id)
    .bind(&p.first_name)
    .bind(&p.last_name)
    .bind(&p.gender)
    .bind(p.age)
    .fetch_one(pool)
    .await
}

/// Delete a user, returning the number of rows removed
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
