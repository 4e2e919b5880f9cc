//! Domain types for the influencer evaluation engine.
//!
//! ## Observed shapes from the scrape collaborator
//!
//! ### Counts
//! Like/comment/view counts may be absent on older captures or private
//! posts. All counts use `#[serde(default)]` and default to `0`; views are
//! additionally optional because only video content carries them.
//!
//! ### Timestamps
//! `taken_at` arrives as an ISO-8601 string. Some captures contain
//! malformed or placeholder values; those deserialize to `None` rather than
//! failing the whole payload (lenient parse, see [`lenient_datetime`]).
//!
//! ### Ordering
//! Posts are documented as most-recent-first, but the trend analyzer
//! re-sorts defensively before windowing — the ordering here is a hint, not
//! an invariant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Normalize a username into the engine's identity key.
///
/// Identity is case-insensitive and surrounding whitespace is never
/// significant; every cache and index operation keys on this form.
#[must_use]
pub fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}

/// A scraped account profile. Immutable per fetch; a fresh fetch replaces
/// it wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Raw username as captured. Normalize with [`normalize_username`]
    /// before using as an identity key.
    pub username: String,

    /// Follower count. Defaults to `0` when the collaborator omits it —
    /// the orchestrator treats `0` as a missing primary signal and retries
    /// the fetch once.
    #[serde(default)]
    pub followers: u64,

    /// Free-text biography. May be absent or empty.
    #[serde(default)]
    pub biography: Option<String>,

    /// Profile image reference (URL). Passed through unexamined.
    #[serde(default)]
    pub profile_image_url: Option<String>,

    /// Platform verification badge.
    #[serde(default)]
    pub is_verified: bool,
}

/// Content type of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    /// Static feed image.
    FeedImage,
    /// Feed video / reel. Only this kind carries view counts.
    FeedVideo,
}

/// A sampled comment on a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostComment {
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub likes: u64,
}

/// A single scraped post. Read-only once fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,

    #[serde(default)]
    pub likes: u64,

    #[serde(default)]
    pub comments: u64,

    /// View count; present on videos only.
    #[serde(default)]
    pub views: Option<u64>,

    /// Post timestamp. `None` when absent or unparseable.
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub taken_at: Option<DateTime<Utc>>,

    pub kind: ContentKind,

    #[serde(default)]
    pub caption: Option<String>,

    #[serde(default)]
    pub hashtags: Vec<String>,

    /// Up to N sampled comments, as captured upstream.
    #[serde(default)]
    pub sampled_comments: Vec<PostComment>,
}

/// Deserialize an optional ISO-8601 timestamp, mapping malformed values to
/// `None` instead of erroring. Bad dates are a degraded input, not a fault.
fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }))
}

/// Investment-oriented letter tier derived from follower bracket × ER
/// bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    S,
    A,
    B,
    C,
    D,
}

/// A single campaign-suitability sub-score with its letter grade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CampaignGrade {
    pub grade: Tier,
    /// Weighted sub-score in `[0, 100]`.
    pub score: f64,
}

/// Campaign-suitability breakdown across the three campaign types.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CampaignSuitability {
    pub sponsorship: CampaignGrade,
    pub paid_ad: CampaignGrade,
    pub co_purchase: CampaignGrade,
}

/// Derived metrics for one evaluation. Recomputed on every run, never
/// persisted independently of its parent [`AnalysisRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Blended engagement rate over all posts, percent, 2-decimal rounded.
    pub total_er: f64,
    /// Engagement rate over feed images, percent, 2-decimal rounded.
    pub feed_er: f64,
    /// Views-weighted engagement rate over videos, percent, 2-decimal rounded.
    pub reels_er: f64,
    pub avg_likes: f64,
    pub avg_comments: f64,
    /// Mean views across posts that carry a view count; `0.0` when none do.
    pub avg_views: f64,
    /// Complement of the bot ratio, `0–100`.
    pub authenticity_score: f64,
    /// Share of sampled comments flagged by the bot heuristics, `0–100`.
    pub bot_ratio: f64,
    pub is_fake: bool,
    /// Share of sampled comments containing purchase-intent vocabulary, `0–100`.
    pub purchase_keyword_ratio: f64,
    pub is_active: bool,
    /// Mean days between posts; `None` with fewer than 2 dated posts.
    pub avg_upload_cycle_days: Option<u32>,
    pub market_suitable: bool,
    pub campaign: CampaignSuitability,
    pub tier: Tier,
}

/// Per-window aggregates used by the trend report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodStats {
    /// Window engagement rate, percent, 2-decimal rounded. `0.0` for an
    /// empty window or zero followers.
    pub er: f64,
    pub avg_likes: f64,
    pub avg_comments: f64,
}

impl PeriodStats {
    /// Stats for an empty window — windows beyond the available data are
    /// empty, not padded.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            er: 0.0,
            avg_likes: 0.0,
            avg_comments: 0.0,
        }
    }
}

/// Trend direction over the three comparison windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErTrend {
    Rising,
    Stable,
    Declining,
}

/// Three-window trend report over the most recent posts.
///
/// Produced only when at least `MIN_POSTS_FOR_TREND` posts are available;
/// callers receive `None` otherwise, never a degenerate report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendReport {
    pub recent: PeriodStats,
    pub middle: PeriodStats,
    pub oldest: PeriodStats,
    pub er_trend: ErTrend,
    /// Signed percent change of recent ER vs. the prior windows, 1-decimal
    /// rounded.
    pub er_change_percent: f64,
    /// Mean days between uploads, rounded to whole days; `0` with fewer
    /// than 2 parseable timestamps.
    pub avg_upload_frequency_days: u32,
    /// Number of posts actually analyzed (capped at the 30-post lookback).
    pub total_posts: usize,
}

/// A qualification criterion checked by the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    MinFollowers,
    MinAuthenticity,
    Activity,
    UploadCadence,
}

/// Pass/fail result for one criterion, with the observed and required
/// values so callers can render the breakdown without re-deriving
/// thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CriterionResult {
    pub criterion: Criterion,
    pub passed: bool,
    pub observed: f64,
    pub required: f64,
}

/// Stable "badges" object attached to the final record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualificationReport {
    pub criteria: Vec<CriterionResult>,
    /// True only when every criterion passed.
    pub qualified: bool,
}

/// A complete analysis record — the unit the cache stores and the
/// similarity index derives vectors from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    /// Normalized identity key (lowercased, trimmed).
    pub username: String,
    pub analyzed_at: DateTime<Utc>,
    pub metrics: MetricsSnapshot,
    pub trend: Option<TrendReport>,
    pub qualification: QualificationReport,
    /// Opaque qualitative payload from the LLM collaborator. The engine
    /// reads only the leaf paths in [`crate::qualitative`]; everything else
    /// passes through unexamined.
    pub qualitative: serde_json::Value,
    /// Feature embedding, generated best-effort after evaluation or lazily
    /// on the first similarity query.
    #[serde(default)]
    pub embedding: Option<Vec<f32>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_username_trims_and_lowercases() {
        assert_eq!(normalize_username("  Some_User "), "some_user");
        assert_eq!(normalize_username("ALLCAPS"), "allcaps");
    }

    #[test]
    fn post_counts_default_to_zero() {
        let post: Post = serde_json::from_str(
            r#"{"id": "p1", "kind": "feed_image"}"#,
        )
        .expect("minimal post should deserialize");
        assert_eq!(post.likes, 0);
        assert_eq!(post.comments, 0);
        assert!(post.views.is_none());
        assert!(post.taken_at.is_none());
        assert!(post.sampled_comments.is_empty());
    }

    #[test]
    fn unparseable_timestamp_becomes_none() {
        let post: Post = serde_json::from_str(
            r#"{"id": "p1", "kind": "feed_video", "taken_at": "not-a-date"}"#,
        )
        .expect("bad timestamp must not fail the payload");
        assert!(post.taken_at.is_none());
    }

    #[test]
    fn valid_timestamp_parses_to_utc() {
        let post: Post = serde_json::from_str(
            r#"{"id": "p1", "kind": "feed_image", "taken_at": "2026-07-01T12:00:00+09:00"}"#,
        )
        .expect("valid timestamp should deserialize");
        let dt = post.taken_at.expect("timestamp present");
        assert_eq!(dt.to_rfc3339(), "2026-07-01T03:00:00+00:00");
    }

    #[test]
    fn content_kind_uses_snake_case_wire_names() {
        assert_eq!(
            serde_json::to_string(&ContentKind::FeedVideo).expect("serialize"),
            "\"feed_video\""
        );
    }

    #[test]
    fn er_trend_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ErTrend::Declining).expect("serialize"),
            "\"declining\""
        );
    }
}
