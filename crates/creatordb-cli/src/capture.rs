//! File-backed collaborators for offline evaluation.
//!
//! A capture file is the JSON output of one scrape run: the profile, the
//! recent posts, and optionally the qualitative judgment produced for it.
//! Feeding captures through the real engine keeps the CLI honest — the
//! pipeline cannot tell a capture from a live scrape adapter.

use std::path::Path;

use serde::Deserialize;

use creatordb_core::{MetricsSnapshot, Post, Profile, TrendReport};
use creatordb_engine::{FetchError, ProfileSource, QualitativeAnalyzer};

/// One scrape capture, as stored on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCapture {
    pub profile: Profile,
    #[serde(default)]
    pub posts: Vec<Post>,
    /// Pre-recorded qualitative judgment, when the capture includes one.
    #[serde(default)]
    pub qualitative: Option<serde_json::Value>,
}

impl RawCapture {
    /// Load a capture from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error when the file is unreadable or not a valid capture.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("cannot read capture {}: {e}", path.display()))?;
        let capture: RawCapture = serde_json::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("invalid capture {}: {e}", path.display()))?;
        Ok(capture)
    }
}

/// Profile source serving a single loaded capture.
pub struct CaptureSource {
    capture: RawCapture,
}

impl CaptureSource {
    #[must_use]
    pub fn new(capture: RawCapture) -> Self {
        Self { capture }
    }
}

impl ProfileSource for CaptureSource {
    async fn fetch_profile(&self, _username: &str) -> Result<Profile, FetchError> {
        Ok(self.capture.profile.clone())
    }

    async fn fetch_recent_posts(
        &self,
        _username: &str,
        limit: usize,
    ) -> Result<Vec<Post>, FetchError> {
        Ok(self.capture.posts.iter().take(limit).cloned().collect())
    }
}

/// Analyzer replaying the capture's recorded judgment; captures without one
/// evaluate with a null blob, same as a degraded live run.
pub struct CaptureAnalyzer {
    qualitative: serde_json::Value,
}

impl CaptureAnalyzer {
    #[must_use]
    pub fn new(qualitative: Option<serde_json::Value>) -> Self {
        Self {
            qualitative: qualitative.unwrap_or(serde_json::Value::Null),
        }
    }
}

impl QualitativeAnalyzer for CaptureAnalyzer {
    async fn analyze(
        &self,
        _profile: &Profile,
        _metrics: &MetricsSnapshot,
        _trend: Option<&TrendReport>,
    ) -> Result<serde_json::Value, FetchError> {
        Ok(self.qualitative.clone())
    }
}
