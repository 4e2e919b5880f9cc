//! Caller-facing error taxonomy for the evaluation surface.

use serde::Serialize;
use thiserror::Error;

use crate::sources::FetchError;
use creatordb_similarity::SimilarityError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("account not found: {username}")]
    AccountNotFound { username: String },

    #[error("account is private: {username}")]
    PrivateAccount { username: String },

    #[error("rate limited by the scrape collaborator")]
    RateLimited,

    #[error("collaborator backend error: {0}")]
    Backend(String),

    /// Anything the taxonomy does not classify; callers see a stable code
    /// instead of an internal error chain.
    #[error("unexpected engine failure: {0}")]
    Unknown(String),
}

impl EngineError {
    /// Stable caller-facing error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::AccountNotFound { .. } => "ACCOUNT_NOT_FOUND",
            EngineError::PrivateAccount { .. } => "PRIVATE_ACCOUNT",
            EngineError::RateLimited => "RATE_LIMIT",
            EngineError::Backend(_) => "BACKEND_ERROR",
            EngineError::Unknown(_) => "UNKNOWN",
        }
    }
}

impl From<FetchError> for EngineError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::AccountNotFound { username } => EngineError::AccountNotFound { username },
            FetchError::PrivateAccount { username } => EngineError::PrivateAccount { username },
            FetchError::RateLimited { .. } => EngineError::RateLimited,
            FetchError::Timeout { timeout_secs } => {
                EngineError::Backend(format!("collaborator timed out after {timeout_secs}s"))
            }
            FetchError::Backend(reason) => EngineError::Backend(reason),
        }
    }
}

/// JSON error shape returned across the API boundary:
/// `{"code": "...", "message": "..."}`.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl From<&EngineError> for ErrorBody {
    fn from(err: &EngineError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<&SimilarityError> for ErrorBody {
    fn from(err: &SimilarityError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_errors_map_to_stable_codes() {
        let cases = [
            (
                FetchError::AccountNotFound {
                    username: "ghost".into(),
                },
                "ACCOUNT_NOT_FOUND",
            ),
            (
                FetchError::PrivateAccount {
                    username: "hidden".into(),
                },
                "PRIVATE_ACCOUNT",
            ),
            (
                FetchError::RateLimited {
                    retry_after_secs: 60,
                },
                "RATE_LIMIT",
            ),
            (FetchError::Timeout { timeout_secs: 30 }, "BACKEND_ERROR"),
            (FetchError::Backend("boom".into()), "BACKEND_ERROR"),
        ];
        for (fetch_err, expected) in cases {
            assert_eq!(EngineError::from(fetch_err).code(), expected);
        }
    }

    #[test]
    fn error_body_carries_code_and_message() {
        let err = EngineError::AccountNotFound {
            username: "ghost".into(),
        };
        let body = ErrorBody::from(&err);
        assert_eq!(body.code, "ACCOUNT_NOT_FOUND");
        assert!(body.message.contains("ghost"));
    }

    #[test]
    fn similarity_errors_share_the_body_shape() {
        let err = SimilarityError::NoEmbedding {
            username: "ghost".into(),
            reason: "TEI unreachable".into(),
        };
        let body = ErrorBody::from(&err);
        assert_eq!(body.code, "NO_EMBEDDING");
    }
}
