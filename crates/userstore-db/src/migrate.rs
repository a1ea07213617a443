use sqlx::migrate::{MigrateError, Migrator};
use sqlx::PgPool;
use tracing::info;

/// Migrations embedded from `migrations/`
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Apply pending migrations (tracked in `_sqlx_migrations`)
pub async fn migrate(pool: &PgPool) -> Result<(), MigrateError> {
    info!(
        available = MIGRATOR.iter().count(),
        "Running database migrations..."
    );
    MIGRATOR.run(pool).await?;
    info!("Database migrations completed");
    Ok(())
}
