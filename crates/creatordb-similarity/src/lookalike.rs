//! Lookalike queries: ensure the target's embedding exists, then query the
//! vector store for its nearest neighbors.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use creatordb_core::{normalize_username, AnalysisRecord, AppConfig};
use creatordb_db::{find_latest, store_embedding};

use crate::embeddings::TeiClient;
use crate::error::SimilarityError;
use crate::feature::FeatureSummary;
use crate::vector_store::{QdrantClient, ScoredPoint};

/// One lookalike hit, enriched with the denormalized summary fields so
/// consumers don't need a second round trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lookalike {
    pub username: String,
    /// Cosine similarity to the target, descending across the result set.
    pub similarity: f32,
    pub followers: u64,
    pub er: f64,
    pub tier: String,
    pub grade: String,
    pub category: String,
    pub purchase_keyword_ratio: f64,
    pub trend_direction: String,
}

impl Lookalike {
    fn from_point(point: &ScoredPoint) -> Self {
        let summary = FeatureSummary::from_payload(&point.payload);
        Self {
            username: summary.username,
            similarity: point.score,
            followers: summary.followers,
            er: summary.er,
            tier: summary.tier,
            grade: summary.grade,
            category: summary.category,
            purchase_keyword_ratio: summary.purchase_keyword_ratio,
            trend_direction: summary.trend_direction,
        }
    }
}

/// Similarity search over analyzed creator accounts.
pub struct SimilarityService {
    pool: PgPool,
    tei: TeiClient,
    store: QdrantClient,
}

impl SimilarityService {
    #[must_use]
    pub fn new(pool: PgPool, tei_url: &str, qdrant_url: &str, collection: &str) -> Self {
        Self {
            pool,
            tei: TeiClient::new(tei_url),
            store: QdrantClient::new(qdrant_url, collection),
        }
    }

    #[must_use]
    pub fn from_config(pool: PgPool, config: &AppConfig) -> Self {
        Self::new(
            pool,
            &config.tei_url,
            &config.qdrant_url,
            &config.qdrant_collection,
        )
    }

    /// Find accounts similar to `username`.
    ///
    /// Ensures the target's embedding exists (generating and persisting it
    /// on a miss), queries the store with the given `threshold` (clamped to
    /// `[0, 1]`) and `limit` (at least 1), excludes the target from its own
    /// result set, and returns hits ordered by descending similarity.
    ///
    /// # Errors
    ///
    /// - [`SimilarityError::TargetNotFound`] — identity never analyzed.
    /// - [`SimilarityError::NoEmbedding`] — no cached vector and generation
    ///   failed.
    /// - [`SimilarityError::Qdrant`]/[`SimilarityError::Db`] — the backend
    ///   query itself failed.
    pub async fn find_similar(
        &self,
        username: &str,
        threshold: f32,
        limit: usize,
    ) -> Result<Vec<Lookalike>, SimilarityError> {
        let identity = normalize_username(username);
        let threshold = threshold.clamp(0.0, 1.0);
        let limit = limit.max(1);

        let row = find_latest(&self.pool, &identity)
            .await?
            .ok_or_else(|| SimilarityError::TargetNotFound {
                username: identity.clone(),
            })?;
        let row_id = row.id;
        let record = row.into_record()?;

        let vector = match record.embedding.as_ref().filter(|v| !v.is_empty()) {
            Some(vector) => vector.clone(),
            None => {
                tracing::debug!(username = %identity, "no cached embedding — generating");
                self.index_record(row_id, &record)
                    .await
                    .map_err(|e| match e {
                        SimilarityError::Tei(reason) => SimilarityError::NoEmbedding {
                            username: identity.clone(),
                            reason,
                        },
                        other => other,
                    })?
            }
        };

        let hits = self.store.search(&vector, threshold, limit, &identity).await?;

        // The store already excludes the target via payload filter; drop it
        // here too in case the point predates the filterable payload.
        let mut lookalikes: Vec<Lookalike> = hits
            .iter()
            .filter(|p| {
                p.payload
                    .get("username")
                    .and_then(serde_json::Value::as_str)
                    != Some(identity.as_str())
            })
            .map(Lookalike::from_point)
            .collect();
        lookalikes.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok(lookalikes)
    }

    /// Generate the feature embedding for a record and persist it — into
    /// the vector store and best-effort back onto the database row.
    ///
    /// Used eagerly after a successful evaluation and lazily on the first
    /// similarity query against a record with no vector.
    ///
    /// # Errors
    ///
    /// Returns [`SimilarityError::Tei`] when generation fails and
    /// [`SimilarityError::Qdrant`] when the vector store rejects the point.
    pub async fn index_record(
        &self,
        row_id: i64,
        record: &AnalysisRecord,
    ) -> Result<Vec<f32>, SimilarityError> {
        let summary = FeatureSummary::from_record(record);
        let text = summary.embedding_text(&record.qualitative);
        let vector = self.tei.embed_one(&text).await?;

        self.store.ensure_collection().await?;
        self.store
            .upsert_point(&record.username, vector.clone(), summary.to_payload())
            .await?;

        // Persisting the vector back onto the row is best-effort: a write
        // failure only means regeneration on the next query.
        if let Err(e) = store_embedding(&self.pool, row_id, &vector).await {
            tracing::warn!(
                username = %record.username,
                row_id,
                error = %e,
                "failed to persist embedding onto analysis record"
            );
        }

        Ok(vector)
    }
}
