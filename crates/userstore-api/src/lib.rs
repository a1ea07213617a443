//! userstore API library
//!
//! Validated CRUD over the Postgres user store, with a cache-aside read path
//! for single users.

pub mod accessor;
pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod lookup;
pub mod model;
pub mod routes;
pub mod server;
pub mod state;
pub mod store;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;

pub use accessor::UserAccessor;
pub use cache::{CacheStore, MemoryCacheStore, RedisCacheStore};
pub use config::Config;
pub use error::{AccessError, AppError, CacheError, StartupError, StoreError};
pub use lookup::{CacheStatus, UserLookup};
pub use server::{create_router, start_server};
pub use state::AppState;
pub use store::{PgRecordStore, RecordStore};
