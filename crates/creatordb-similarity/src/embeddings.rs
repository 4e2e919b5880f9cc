//! TEI (Text Embeddings Inference) client for vector generation.

use serde::Serialize;

use crate::error::SimilarityError;

/// Maximum number of texts per /embed call.
const BATCH_SIZE: usize = 16;

/// TEI HTTP client.
pub struct TeiClient {
    client: reqwest::Client,
    url: String,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    inputs: &'a [&'a str],
}

impl TeiClient {
    /// Create a new `TeiClient` against a TEI base URL.
    #[must_use]
    pub fn new(tei_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: format!("{}/embed", tei_url.trim_end_matches('/')),
        }
    }

    /// Generate embeddings for a batch of texts.
    ///
    /// Texts are batched into groups of [`BATCH_SIZE`] per request.
    /// Returns one embedding vector per input text, in the same order.
    ///
    /// # Errors
    ///
    /// Returns [`SimilarityError::Tei`] if the request fails, the response
    /// cannot be parsed, or TEI returns a different number of vectors than
    /// inputs.
    pub async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, SimilarityError> {
        let mut all_embeddings = Vec::with_capacity(texts.len());

        for chunk in texts.chunks(BATCH_SIZE) {
            let request = EmbedRequest { inputs: chunk };
            let response = self
                .client
                .post(&self.url)
                .json(&request)
                .send()
                .await
                .map_err(|e| SimilarityError::Tei(format!("TEI request failed: {e}")))?;

            if !response.status().is_success() {
                return Err(SimilarityError::Tei(format!(
                    "TEI returned status {}",
                    response.status()
                )));
            }

            let embeddings: Vec<Vec<f32>> = response
                .json()
                .await
                .map_err(|e| SimilarityError::Tei(format!("TEI response parse error: {e}")))?;

            if embeddings.len() != chunk.len() {
                return Err(SimilarityError::Tei(format!(
                    "TEI returned {} embeddings for {} inputs",
                    embeddings.len(),
                    chunk.len()
                )));
            }

            all_embeddings.extend(embeddings);
        }

        Ok(all_embeddings)
    }

    /// Generate the embedding for a single text.
    ///
    /// # Errors
    ///
    /// Returns [`SimilarityError::Tei`] on request failure or an empty
    /// response.
    pub async fn embed_one(&self, text: &str) -> Result<Vec<f32>, SimilarityError> {
        let mut embeddings = self.embed(&[text]).await?;
        embeddings
            .pop()
            .ok_or_else(|| SimilarityError::Tei("TEI returned empty embedding".to_string()))
    }
}
