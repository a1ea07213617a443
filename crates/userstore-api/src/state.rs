use std::sync::Arc;

use crate::accessor::UserAccessor;
use crate::auth::BasicCredentials;
use crate::cache::CacheStore;
use crate::config::Config;
use crate::lookup::UserLookup;
use crate::store::RecordStore;

/// Shared application state passed to all route handlers
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserAccessor>,
    pub lookup: Arc<UserLookup>,
    pub credentials: Arc<BasicCredentials>,
}

impl AppState {
    /// Wire the accessor and the lookup guard over the given store handles
    pub fn new(records: Arc<dyn RecordStore>, cache: Arc<dyn CacheStore>, config: &Config) -> Self {
        let users = Arc::new(UserAccessor::new(records));
        let lookup = UserLookup::new(users.clone(), cache, config.cache_ttl)
            .with_invalidate_on_write(config.invalidate_on_write);

        Self {
            users,
            lookup: Arc::new(lookup),
            credentials: Arc::new(BasicCredentials::new(config.basic_auth_users.clone())),
        }
    }
}
