//! Collaborator seams: the raw-scrape adapter and the qualitative (LLM)
//! analyzer are external systems consumed through these traits. The engine
//! never talks to a platform or a language model directly.

use creatordb_core::{MetricsSnapshot, Post, Profile, TrendReport};
use thiserror::Error;

/// Failure taxonomy for collaborator calls, mirrored into the caller-facing
/// codes by the orchestrator.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("account not found: {username}")]
    AccountNotFound { username: String },

    #[error("account is private: {username}")]
    PrivateAccount { username: String },

    #[error("rate limited (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("collaborator timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("collaborator backend error: {0}")]
    Backend(String),
}

/// The raw-scrape collaborator: produces profile and post records for an
/// identity. Each call is expected to carry its own timeout; cancellation
/// propagates by dropping the returned future.
pub trait ProfileSource: Send + Sync {
    /// Fetch the current profile for `username` (already normalized).
    fn fetch_profile(
        &self,
        username: &str,
    ) -> impl std::future::Future<Output = Result<Profile, FetchError>> + Send;

    /// Fetch up to `limit` most recent posts for `username`.
    fn fetch_recent_posts(
        &self,
        username: &str,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<Post>, FetchError>> + Send;
}

/// The qualitative collaborator: an LLM call that turns the computed
/// metrics into an opaque judgment blob. The engine persists the blob and
/// reads only a handful of leaf fields from it.
pub trait QualitativeAnalyzer: Send + Sync {
    fn analyze(
        &self,
        profile: &Profile,
        metrics: &MetricsSnapshot,
        trend: Option<&TrendReport>,
    ) -> impl std::future::Future<Output = Result<serde_json::Value, FetchError>> + Send;
}
