//! Service configuration.

use std::str::FromStr;

/// Default bind address.
const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8000";

/// Default database location, relative to the working directory.
const DEFAULT_DATABASE_URL: &str = "sqlite://transactions.db";

const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 5;

/// Uploads are buffered whole, so this caps memory per request.
const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

/// Large uploads are parsed and committed inside the request.
const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 120;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:8000").
    pub listen_addr: String,

    /// `SQLite` database URL (default: "sqlite://transactions.db").
    pub database_url: String,

    /// Maximum number of pooled database connections.
    pub database_max_connections: u32,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable values fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            listen_addr: lookup("LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.into()),
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into()),
            database_max_connections: parsed(&lookup, "DATABASE_MAX_CONNECTIONS")
                .unwrap_or(DEFAULT_DATABASE_MAX_CONNECTIONS),
            cors_origins: lookup("CORS_ORIGINS")
                .unwrap_or_else(|| "*".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            max_body_bytes: parsed(&lookup, "MAX_BODY_BYTES").unwrap_or(DEFAULT_MAX_BODY_BYTES),
            request_timeout_seconds: parsed(&lookup, "REQUEST_TIMEOUT_SECONDS")
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECONDS),
        }
    }
}

/// Look up `key` and parse it, treating unparsable values as unset.
fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|s| s.trim().parse().ok())
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.into(),
            database_url: DEFAULT_DATABASE_URL.into(),
            database_max_connections: DEFAULT_DATABASE_MAX_CONNECTIONS,
            cors_origins: vec!["*".into()],
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
        }
    }
}
