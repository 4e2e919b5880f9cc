//! The evaluation pipeline.
//!
//! One call per account: cache lookup, parallel collaborator fan-out, pure
//! metric computation, record assembly, best-effort persistence and
//! indexing. The record is assembled only after every fallible step, so a
//! failed evaluation never leaves a half-populated row behind, and
//! cancellation (dropping the future) cannot interrupt a partial write.

use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use creatordb_core::{normalize_username, AnalysisRecord, AppConfig, Profile};
use creatordb_db::{lookup_fresh, upsert_latest};
use creatordb_metrics::{
    analyze_trend, compute_metrics, evaluate_qualification, MetricsPolicy, TREND_LOOKBACK_POSTS,
};
use creatordb_similarity::SimilarityService;

use crate::error::EngineError;
use crate::retry::retry_once_when;
use crate::sources::{ProfileSource, QualitativeAnalyzer};

/// Engine tuning, usually derived from [`AppConfig`].
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum age of a cached analysis still served as a hit.
    pub cache_freshness: Duration,
    /// Fixed backoff before the single follower-enrichment retry.
    pub enrich_retry_backoff: Duration,
    pub metrics_policy: MetricsPolicy,
}

impl EngineConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            cache_freshness: config.cache_freshness(),
            enrich_retry_backoff: config.enrich_retry_backoff(),
            metrics_policy: MetricsPolicy {
                activity_window_days: config.activity_window_days,
                ..MetricsPolicy::default()
            },
        }
    }
}

/// Result of one evaluation.
#[derive(Debug)]
pub struct Evaluation {
    pub record: AnalysisRecord,
    /// Database row holding the record; `None` when persistence failed
    /// (the in-memory record is still valid).
    pub row_id: Option<i64>,
    /// Whether the record was served from the cache without recomputation.
    pub cache_hit: bool,
}

/// The evaluation orchestrator.
pub struct Engine<S, Q> {
    source: S,
    analyzer: Q,
    pool: PgPool,
    similarity: Option<SimilarityService>,
    config: EngineConfig,
}

impl<S, Q> Engine<S, Q>
where
    S: ProfileSource,
    Q: QualitativeAnalyzer,
{
    #[must_use]
    pub fn new(source: S, analyzer: Q, pool: PgPool, config: EngineConfig) -> Self {
        Self {
            source,
            analyzer,
            pool,
            similarity: None,
            config,
        }
    }

    /// Attach a similarity service so evaluations eagerly index their
    /// records. Without one, embeddings are generated lazily on the first
    /// lookalike query instead.
    #[must_use]
    pub fn with_similarity(mut self, similarity: SimilarityService) -> Self {
        self.similarity = Some(similarity);
        self
    }

    /// Evaluate an account now.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when the scrape collaborator fails on the
    /// critical profile fetch; all other steps degrade instead of failing.
    pub async fn evaluate(&self, username: &str) -> Result<Evaluation, EngineError> {
        self.evaluate_at(username, Utc::now()).await
    }

    /// Evaluate an account at an explicit timestamp (reproducible runs).
    ///
    /// # Errors
    ///
    /// See [`Engine::evaluate`].
    pub async fn evaluate_at(
        &self,
        username: &str,
        now: DateTime<Utc>,
    ) -> Result<Evaluation, EngineError> {
        let identity = normalize_username(username);

        // A fresh cache hit short-circuits the expensive scrape + compute
        // path entirely. Cache infrastructure failures degrade to a miss.
        match lookup_fresh(&self.pool, &identity, now, self.config.cache_freshness).await {
            Ok(Some(row)) => {
                let row_id = row.id;
                match row.into_record() {
                    Ok(record) => {
                        tracing::info!(username = %identity, row_id, "analysis cache hit");
                        return Ok(Evaluation {
                            record,
                            row_id: Some(row_id),
                            cache_hit: true,
                        });
                    }
                    Err(e) => {
                        tracing::warn!(
                            username = %identity,
                            row_id,
                            error = %e,
                            "cached record is corrupt — re-evaluating"
                        );
                    }
                }
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(username = %identity, error = %e, "cache lookup failed — evaluating without cache");
            }
        }

        // Fan out the two independent collaborator fetches and wait for
        // both. The profile is critical; the post list degrades to empty.
        let (profile_result, posts_result) = tokio::join!(
            self.fetch_profile_enriched(&identity),
            self.source.fetch_recent_posts(&identity, TREND_LOOKBACK_POSTS),
        );

        let profile = profile_result.map_err(EngineError::from)?;
        let posts = match posts_result {
            Ok(posts) => posts,
            Err(e) => {
                tracing::warn!(
                    username = %identity,
                    error = %e,
                    "post fetch failed — evaluating profile-only with an empty post list"
                );
                Vec::new()
            }
        };

        let metrics = compute_metrics(&profile, &posts, &self.config.metrics_policy, now);
        let trend = analyze_trend(&posts, profile.followers);
        if trend.is_none() {
            tracing::debug!(
                username = %identity,
                posts = posts.len(),
                "insufficient posts for a trend report"
            );
        }
        let qualification = evaluate_qualification(&profile, &metrics);

        // The qualitative judgment is non-critical: the record stands
        // without it.
        let qualitative = match self.analyzer.analyze(&profile, &metrics, trend.as_ref()).await {
            Ok(blob) => blob,
            Err(e) => {
                tracing::warn!(
                    username = %identity,
                    error = %e,
                    "qualitative analyzer failed — persisting record without a judgment"
                );
                serde_json::Value::Null
            }
        };

        let mut record = AnalysisRecord {
            username: identity.clone(),
            analyzed_at: now,
            metrics,
            trend,
            qualification,
            qualitative,
            embedding: None,
        };

        // Best-effort persistence: a storage failure must not fail the
        // user-facing evaluation.
        let row_id = match upsert_latest(&self.pool, &record).await {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!(
                    username = %identity,
                    error = %e,
                    "failed to persist analysis record — returning in-memory result"
                );
                None
            }
        };

        // Best-effort eager indexing; a failed embedding never blocks the
        // evaluation, the lookalike path regenerates lazily.
        if let (Some(id), Some(similarity)) = (row_id, self.similarity.as_ref()) {
            match similarity.index_record(id, &record).await {
                Ok(vector) => record.embedding = Some(vector),
                Err(e) => {
                    tracing::warn!(
                        username = %identity,
                        error = %e,
                        "embedding generation failed — record stored without a vector"
                    );
                }
            }
        }

        Ok(Evaluation {
            record,
            row_id,
            cache_hit: false,
        })
    }

    /// Profile fetch with the single permitted enrichment retry: when the
    /// follower count (the primary signal) comes back missing, try once
    /// more after a short fixed backoff and keep whichever result carries
    /// the signal.
    async fn fetch_profile_enriched(
        &self,
        identity: &str,
    ) -> Result<Profile, crate::sources::FetchError> {
        retry_once_when(
            self.config.enrich_retry_backoff,
            || self.source.fetch_profile(identity),
            |result| matches!(result, Ok(profile) if profile.followers == 0),
        )
        .await
    }
}
