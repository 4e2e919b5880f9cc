//! Embedding-based lookalike search for analyzed creator accounts.
//!
//! Derives a fixed-shape feature summary from a cached analysis record,
//! vectorizes it through a TEI embedding endpoint, stores the vector in a
//! Qdrant collection (and back onto the record), and answers
//! nearest-neighbor queries with threshold + result-count controls.

pub mod embeddings;
pub mod error;
pub mod feature;
pub mod lookalike;
pub mod vector_store;

pub use embeddings::TeiClient;
pub use error::SimilarityError;
pub use feature::FeatureSummary;
pub use lookalike::{Lookalike, SimilarityService};
pub use vector_store::{QdrantClient, ScoredPoint};
