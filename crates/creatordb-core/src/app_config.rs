use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub log_level: String,
    /// Base URL of the TEI embedding collaborator.
    pub tei_url: String,
    /// Base URL of the Qdrant vector store.
    pub qdrant_url: String,
    pub qdrant_collection: String,
    /// Maximum age of a cached analysis still served as a hit. Default 24h.
    pub cache_freshness_hours: u64,
    /// Days since the latest post within which an account counts as active.
    pub activity_window_days: u32,
    /// Per-request timeout for collaborator calls.
    pub fetch_timeout_secs: u64,
    /// Fixed backoff before the single permitted enrichment retry.
    pub enrich_retry_backoff_ms: u64,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

impl AppConfig {
    /// Cache freshness window as a [`Duration`].
    #[must_use]
    pub const fn cache_freshness(&self) -> Duration {
        Duration::from_secs(self.cache_freshness_hours * 60 * 60)
    }

    /// Backoff before the single enrichment retry as a [`Duration`].
    #[must_use]
    pub const fn enrich_retry_backoff(&self) -> Duration {
        Duration::from_millis(self.enrich_retry_backoff_ms)
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("tei_url", &self.tei_url)
            .field("qdrant_url", &self.qdrant_url)
            .field("qdrant_collection", &self.qdrant_collection)
            .field("cache_freshness_hours", &self.cache_freshness_hours)
            .field("activity_window_days", &self.activity_window_days)
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field("enrich_retry_backoff_ms", &self.enrich_retry_backoff_ms)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .finish()
    }
}
