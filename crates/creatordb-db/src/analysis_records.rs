//! Database operations for the `analysis_records` table — the engine's
//! analysis cache.
//!
//! The table has no unique constraint on `username`; duplicate historical
//! rows for one identity are legal. Every operation here therefore targets
//! "the most recent row for this identity" (ordered by `analyzed_at DESC,
//! id DESC`), which is the de facto primary key of the cache.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;
use std::time::Duration;

use creatordb_core::AnalysisRecord;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `analysis_records` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AnalysisRecordRow {
    pub id: i64,
    pub username: String,
    pub analyzed_at: DateTime<Utc>,
    pub metrics: Value,
    pub trend: Option<Value>,
    pub qualification: Value,
    pub qualitative: Value,
    pub embedding: Option<Vec<f32>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AnalysisRecordRow {
    /// Rehydrate the domain record from the stored JSONB columns.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Corrupt`] when a stored payload no longer matches
    /// the domain shape (schema drift between deployments).
    pub fn into_record(self) -> Result<AnalysisRecord, DbError> {
        let metrics = serde_json::from_value(self.metrics).map_err(|source| DbError::Corrupt {
            context: format!("analysis_records.metrics id={}", self.id),
            source,
        })?;
        let trend = match self.trend {
            Some(value) => {
                Some(
                    serde_json::from_value(value).map_err(|source| DbError::Corrupt {
                        context: format!("analysis_records.trend id={}", self.id),
                        source,
                    })?,
                )
            }
            None => None,
        };
        let qualification =
            serde_json::from_value(self.qualification).map_err(|source| DbError::Corrupt {
                context: format!("analysis_records.qualification id={}", self.id),
                source,
            })?;

        Ok(AnalysisRecord {
            username: self.username,
            analyzed_at: self.analyzed_at,
            metrics,
            trend,
            qualification,
            qualitative: self.qualitative,
            embedding: self.embedding,
        })
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Return the most recent record row for `username` regardless of age, or
/// `None` if the identity was never analyzed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn find_latest(
    pool: &PgPool,
    username: &str,
) -> Result<Option<AnalysisRecordRow>, DbError> {
    let row = sqlx::query_as::<_, AnalysisRecordRow>(
        "SELECT id, username, analyzed_at, metrics, trend, qualification, \
                qualitative, embedding, created_at, updated_at \
         FROM analysis_records \
         WHERE username = $1 \
         ORDER BY analyzed_at DESC, id DESC \
         LIMIT 1",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Cache lookup: the most recent row for `username`, but only when it is
/// still inside the freshness window (`now − analyzed_at ≤ freshness`).
/// Stale rows stay queryable through [`find_latest`]/[`list_history`] but
/// are a miss here.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn lookup_fresh(
    pool: &PgPool,
    username: &str,
    now: DateTime<Utc>,
    freshness: Duration,
) -> Result<Option<AnalysisRecordRow>, DbError> {
    // Oversized windows clamp to "everything ever analyzed" instead of
    // overflowing the timestamp arithmetic.
    let cutoff = chrono::Duration::from_std(freshness)
        .ok()
        .and_then(|window| now.checked_sub_signed(window))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    let row = sqlx::query_as::<_, AnalysisRecordRow>(
        "SELECT id, username, analyzed_at, metrics, trend, qualification, \
                qualitative, embedding, created_at, updated_at \
         FROM analysis_records \
         WHERE username = $1 AND analyzed_at >= $2 \
         ORDER BY analyzed_at DESC, id DESC \
         LIMIT 1",
    )
    .bind(username)
    .bind(cutoff)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// List historical rows for `username`, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_history(
    pool: &PgPool,
    username: &str,
    limit: i64,
) -> Result<Vec<AnalysisRecordRow>, DbError> {
    let rows = sqlx::query_as::<_, AnalysisRecordRow>(
        "SELECT id, username, analyzed_at, metrics, trend, qualification, \
                qualitative, embedding, created_at, updated_at \
         FROM analysis_records \
         WHERE username = $1 \
         ORDER BY analyzed_at DESC, id DESC \
         LIMIT $2",
    )
    .bind(username)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Upsert a record under latest-row semantics: update the most recent row
/// for the identity when one exists (fresh or stale), insert otherwise.
/// Returns the row id that now holds the record.
///
/// Two concurrent upserts for the same identity race between the SELECT and
/// the write; the outcome is last-writer-wins on the same row, which is the
/// accepted isolation level for this cache.
///
/// # Errors
///
/// Returns [`DbError::Corrupt`] if the record fails JSON encoding, or
/// [`DbError::Sqlx`] if a statement fails.
pub async fn upsert_latest(pool: &PgPool, record: &AnalysisRecord) -> Result<i64, DbError> {
    let metrics = encode(&record.metrics, "metrics")?;
    let trend = match &record.trend {
        Some(report) => Some(encode(report, "trend")?),
        None => None,
    };
    let qualification = encode(&record.qualification, "qualification")?;

    let existing: Option<i64> = sqlx::query_scalar(
        "SELECT id FROM analysis_records \
         WHERE username = $1 \
         ORDER BY analyzed_at DESC, id DESC \
         LIMIT 1",
    )
    .bind(&record.username)
    .fetch_optional(pool)
    .await?;

    let id = match existing {
        Some(id) => {
            sqlx::query(
                "UPDATE analysis_records SET \
                   analyzed_at = $2, metrics = $3, trend = $4, qualification = $5, \
                   qualitative = $6, embedding = $7, updated_at = NOW() \
                 WHERE id = $1",
            )
            .bind(id)
            .bind(record.analyzed_at)
            .bind(&metrics)
            .bind(&trend)
            .bind(&qualification)
            .bind(&record.qualitative)
            .bind(&record.embedding)
            .execute(pool)
            .await?;
            id
        }
        None => {
            sqlx::query_scalar::<_, i64>(
                "INSERT INTO analysis_records \
                   (username, analyzed_at, metrics, trend, qualification, qualitative, embedding) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7) \
                 RETURNING id",
            )
            .bind(&record.username)
            .bind(record.analyzed_at)
            .bind(&metrics)
            .bind(&trend)
            .bind(&qualification)
            .bind(&record.qualitative)
            .bind(&record.embedding)
            .fetch_one(pool)
            .await?
        }
    };

    Ok(id)
}

/// Persist a lazily generated embedding back onto an existing row.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the row no longer exists, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn store_embedding(pool: &PgPool, id: i64, embedding: &[f32]) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE analysis_records SET embedding = $2, updated_at = NOW() WHERE id = $1",
    )
    .bind(id)
    .bind(embedding.to_vec())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

fn encode<T: serde::Serialize>(value: &T, context: &str) -> Result<Value, DbError> {
    serde_json::to_value(value).map_err(|source| DbError::Corrupt {
        context: format!("analysis_records.{context}"),
        source,
    })
}
