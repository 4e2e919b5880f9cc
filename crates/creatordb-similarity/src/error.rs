use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimilarityError {
    /// The identity was never analyzed; there is no record to embed.
    #[error("no analysis record for target '{username}'")]
    TargetNotFound { username: String },

    /// The record exists but has no embedding and generation failed.
    #[error("no embedding available for '{username}': {reason}")]
    NoEmbedding { username: String, reason: String },

    #[error("TEI embed error: {0}")]
    Tei(String),

    #[error("Qdrant error: {0}")]
    Qdrant(String),

    #[error(transparent)]
    Db(#[from] creatordb_db::DbError),
}

impl SimilarityError {
    /// Stable caller-facing error code. Callers distinguish "never
    /// analyzed" from "embedding unavailable" from "backend down" by this
    /// code, not by message text.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            SimilarityError::TargetNotFound { .. } => "TARGET_NOT_FOUND",
            SimilarityError::NoEmbedding { .. } | SimilarityError::Tei(_) => "NO_EMBEDDING",
            SimilarityError::Qdrant(_) | SimilarityError::Db(_) => "BACKEND_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinguishable() {
        let not_found = SimilarityError::TargetNotFound {
            username: "a".into(),
        };
        let no_embedding = SimilarityError::NoEmbedding {
            username: "a".into(),
            reason: "TEI unreachable".into(),
        };
        let backend = SimilarityError::Qdrant("search failed".into());
        assert_eq!(not_found.code(), "TARGET_NOT_FOUND");
        assert_eq!(no_embedding.code(), "NO_EMBEDDING");
        assert_eq!(backend.code(), "BACKEND_ERROR");
    }
}
