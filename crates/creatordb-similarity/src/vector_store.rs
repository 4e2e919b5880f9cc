//! Qdrant vector store client for creator-profile embeddings.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::SimilarityError;

/// Vector dimension for Qwen3-Embedding-0.6B.
pub const VECTOR_DIM: u64 = 1024;

/// Qdrant HTTP client.
pub struct QdrantClient {
    client: reqwest::Client,
    base_url: String,
    collection: String,
}

#[derive(Serialize)]
struct CreateCollectionRequest {
    vectors: VectorsConfig,
}

#[derive(Serialize)]
struct VectorsConfig {
    size: u64,
    distance: String,
}

#[derive(Serialize)]
struct UpsertPointsRequest {
    points: Vec<Point>,
}

#[derive(Serialize)]
struct Point {
    id: u64,
    vector: Vec<f32>,
    payload: HashMap<String, serde_json::Value>,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    vector: &'a [f32],
    limit: usize,
    score_threshold: f32,
    with_payload: bool,
    filter: SearchFilter,
}

#[derive(Serialize)]
struct SearchFilter {
    must_not: Vec<FieldMatch>,
}

#[derive(Serialize)]
struct FieldMatch {
    key: String,
    r#match: MatchValue,
}

#[derive(Serialize)]
struct MatchValue {
    value: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    result: Vec<ScoredPoint>,
}

/// One nearest-neighbor hit from the store.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoredPoint {
    /// Cosine similarity in `[0, 1]` (higher is closer).
    pub score: f32,
    #[serde(default)]
    pub payload: HashMap<String, serde_json::Value>,
}

impl QdrantClient {
    /// Create a new `QdrantClient`.
    #[must_use]
    pub fn new(qdrant_url: &str, collection: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: qdrant_url.trim_end_matches('/').to_string(),
            collection: collection.to_string(),
        }
    }

    /// Ensure the profile collection exists, creating it if absent.
    ///
    /// Uses cosine distance and [`VECTOR_DIM`]-dimensional vectors.
    ///
    /// # Errors
    ///
    /// Returns [`SimilarityError::Qdrant`] on network or API failure.
    pub async fn ensure_collection(&self) -> Result<(), SimilarityError> {
        let url = format!("{}/collections/{}", self.base_url, self.collection);
        let check = self.client.get(&url).send().await;

        // If the collection already exists, return early.
        if let Ok(resp) = check {
            if resp.status().is_success() {
                return Ok(());
            }
        }

        let body = CreateCollectionRequest {
            vectors: VectorsConfig {
                size: VECTOR_DIM,
                distance: "Cosine".to_string(),
            },
        };

        let resp = self
            .client
            .put(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                SimilarityError::Qdrant(format!("collection create request failed: {e}"))
            })?;

        if !resp.status().is_success() {
            return Err(SimilarityError::Qdrant(format!(
                "collection create returned status {}",
                resp.status()
            )));
        }

        Ok(())
    }

    /// Upsert one profile point. The point ID is derived from the username
    /// so re-indexing the same identity always overwrites its point.
    ///
    /// # Errors
    ///
    /// Returns [`SimilarityError::Qdrant`] on network or API failure.
    pub async fn upsert_point(
        &self,
        username: &str,
        vector: Vec<f32>,
        payload: HashMap<String, serde_json::Value>,
    ) -> Result<(), SimilarityError> {
        let body = UpsertPointsRequest {
            points: vec![Point {
                id: username_point_id(username),
                vector,
                payload,
            }],
        };

        let url = format!("{}/collections/{}/points", self.base_url, self.collection);
        let resp = self
            .client
            .put(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| SimilarityError::Qdrant(format!("upsert request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(SimilarityError::Qdrant(format!(
                "upsert returned status {}",
                resp.status()
            )));
        }

        Ok(())
    }

    /// Nearest-neighbor search by cosine similarity.
    ///
    /// `exclude_username` is filtered out server-side (`must_not` on the
    /// payload) so a profile can never be its own lookalike. Results come
    /// back ordered by descending similarity.
    ///
    /// # Errors
    ///
    /// Returns [`SimilarityError::Qdrant`] on network or API failure.
    pub async fn search(
        &self,
        vector: &[f32],
        threshold: f32,
        limit: usize,
        exclude_username: &str,
    ) -> Result<Vec<ScoredPoint>, SimilarityError> {
        let body = SearchRequest {
            vector,
            limit,
            score_threshold: threshold,
            with_payload: true,
            filter: SearchFilter {
                must_not: vec![FieldMatch {
                    key: "username".to_string(),
                    r#match: MatchValue {
                        value: exclude_username.to_string(),
                    },
                }],
            },
        };

        let url = format!(
            "{}/collections/{}/points/search",
            self.base_url, self.collection
        );
        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| SimilarityError::Qdrant(format!("search request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(SimilarityError::Qdrant(format!(
                "search returned status {}",
                resp.status()
            )));
        }

        let parsed: SearchResponse = resp
            .json()
            .await
            .map_err(|e| SimilarityError::Qdrant(format!("search response parse error: {e}")))?;

        Ok(parsed.result)
    }
}

/// Derive a stable Qdrant point ID (u64) from a normalized username.
///
/// Takes the first 8 bytes of SHA-256(username) and interprets them as a
/// big-endian u64. The same identity always maps to the same point.
#[must_use]
pub fn username_point_id(username: &str) -> u64 {
    let hash = Sha256::digest(username.as_bytes());
    let bytes: [u8; 8] = hash[..8].try_into().expect("SHA256 is at least 8 bytes");
    u64::from_be_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_point_id_is_stable() {
        let id1 = username_point_id("style_maven");
        let id2 = username_point_id("style_maven");
        assert_eq!(id1, id2, "same identity must produce same point ID");
    }

    #[test]
    fn different_usernames_produce_different_ids() {
        let id1 = username_point_id("creator_a");
        let id2 = username_point_id("creator_b");
        assert_ne!(id1, id2);
    }
}
