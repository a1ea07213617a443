//! userstore API server
//!
//! Serves user CRUD over PostgreSQL with a Redis (or in-process) read-through
//! cache in front of single-user lookups.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

use userstore_api::{
    start_server, AppState, CacheStore, Config, MemoryCacheStore, PgRecordStore, RecordStore,
    RedisCacheStore, StartupError,
};

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    // Initialize logging
    let env_filter = EnvFilter::from_default_env().add_directive("userstore_api=info".parse()?);

    // Use JSON format for GCP Cloud Logging when LOG_FORMAT=json
    if std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer())
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    };

    let config = Config::from_env();
    info!(port = config.port, "Starting userstore-api");

    // Connect to database
    info!("Connecting to database...");
    let pool = tokio::time::timeout(
        config.db_connect_timeout,
        PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(config.store_timeout)
            .connect(&config.database_url),
    )
    .await
    .map_err(|_| StartupError::ConnectTimeout(config.db_connect_timeout))??;
    info!("Database connection established");

    userstore_db::migrate::migrate(&pool).await?;

    let records: Arc<dyn RecordStore> = Arc::new(PgRecordStore::new(pool, config.store_timeout));

    let cache: Arc<dyn CacheStore> = match &config.redis_url {
        Some(url) => Arc::new(RedisCacheStore::connect(url, config.store_timeout).await?),
        None => {
            info!(
                max_entries = config.cache_max_entries,
                "No REDIS_URL set, using in-process cache"
            );
            Arc::new(MemoryCacheStore::new(config.cache_max_entries))
        }
    };
    info!(
        ttl_secs = config.cache_ttl.as_secs(),
        invalidate_on_write = config.invalidate_on_write,
        "User cache configured"
    );

    let state = AppState::new(records, cache, &config);

    start_server(state, &config).await?;

    Ok(())
}
