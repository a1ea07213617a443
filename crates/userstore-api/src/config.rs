use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Application configuration parsed from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_connect_timeout: Duration,
    /// Redis cache; the in-process cache is used when unset
    pub redis_url: Option<String>,
    pub cache_ttl: Duration,
    pub cache_max_entries: u64,
    pub invalidate_on_write: bool,
    /// Upper bound on any single record store or cache store call
    pub store_timeout: Duration,
    pub request_timeout: Duration,
    pub basic_auth_users: Vec<(String, String)>,
    pub cors_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            database_url: "postgres://localhost/userstore".to_string(),
            db_max_connections: 10,
            db_connect_timeout: Duration::from_secs(30),
            redis_url: None,
            cache_ttl: Duration::from_secs(30),
            cache_max_entries: 10_000,
            invalidate_on_write: false,
            store_timeout: Duration::from_millis(5000),
            request_timeout: Duration::from_secs(10),
            basic_auth_users: vec![
                ("john".to_string(), "doe".to_string()),
                ("admin".to_string(), "123456".to_string()),
            ],
            cors_origins: vec!["*".to_string()],
        }
    }
}

impl Config {
    /// Parse configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Parse configuration from an arbitrary variable source.
    ///
    /// Unset or unparseable values fall back to [`Config::default`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let parsed = |name: &str| lookup(name).and_then(|v| v.trim().parse::<u64>().ok());

        let port = lookup("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);

        let database_url = database_url(&lookup).unwrap_or(defaults.database_url);

        let db_max_connections =
            parse_or(&lookup, "DB_MAX_CONNECTIONS", defaults.db_max_connections);

        let db_connect_timeout = parsed("DB_CONNECT_TIMEOUT_SECS")
            .map(Duration::from_secs)
            .unwrap_or(defaults.db_connect_timeout);

        let redis_url = lookup("REDIS_URL").filter(|u| !u.trim().is_empty());

        let cache_ttl = parsed("CACHE_TTL_SECS")
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.cache_ttl);

        let cache_max_entries = parse_or(&lookup, "CACHE_MAX_ENTRIES", defaults.cache_max_entries);

        let invalidate_on_write = lookup("CACHE_INVALIDATE_ON_WRITE")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(defaults.invalidate_on_write);

        let store_timeout = parsed("STORE_TIMEOUT_MS")
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(defaults.store_timeout);

        let request_timeout = parsed("REQUEST_TIMEOUT_SECS")
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        let basic_auth_users = lookup("BASIC_AUTH_USERS")
            .map(|s| parse_credentials(&s))
            .unwrap_or(defaults.basic_auth_users);

        let cors_origins = lookup("CORS_ORIGINS")
            .map(|s| s.split(',').map(|o| o.trim().to_string()).collect())
            .unwrap_or(defaults.cors_origins);

        Self {
            port,
            database_url,
            db_max_connections,
            db_connect_timeout,
            redis_url,
            cache_ttl,
            cache_max_entries,
            invalidate_on_write,
            store_timeout,
            request_timeout,
            basic_auth_users,
            cors_origins,
        }
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> T {
    lookup(name)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// `DATABASE_URL`, or a URL assembled from the separate `DB_*` variables
fn database_url(lookup: &impl Fn(&str) -> Option<String>) -> Option<String> {
    if let Some(url) = lookup("DATABASE_URL") {
        return Some(url);
    }

    let host = lookup("DB_HOST")?;
    let name = lookup("DB_NAME").unwrap_or_else(|| "userstore".to_string());
    let user = lookup("DB_USER").unwrap_or_else(|| "postgres".to_string());
    let password = lookup("DB_PASSWORD").unwrap_or_default();
    let port = lookup("DB_PORT").unwrap_or_else(|| "5432".to_string());

    Some(format!(
        "postgresql://{}:{}@{}:{}/{}",
        user, password, host, port, name
    ))
}

/// Parse `user:pass,user:pass`. Entries without a colon or with an empty
/// user name are skipped.
fn parse_credentials(raw: &str) -> Vec<(String, String)> {
    raw.split(',')
        .filter_map(|pair| {
            let (user, pass) = pair.trim().split_once(':')?;
            if user.is_empty() {
                return None;
            }
            Some((user.to_string(), pass.to_string()))
        })
        .collect()
}
