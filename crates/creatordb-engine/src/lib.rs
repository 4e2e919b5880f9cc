//! Evaluation orchestrator for creatordb.
//!
//! Fans out the collaborator fetches for one account, runs the pure metric
//! calculators, assembles the analysis record, and persists it best-effort.
//! A fresh cache hit short-circuits the whole pipeline; collaborator
//! failures are classified into a small caller-facing error taxonomy.

pub mod error;
pub mod pipeline;
pub mod sources;

mod retry;

pub use error::{EngineError, ErrorBody};
pub use pipeline::{Engine, EngineConfig, Evaluation};
pub use sources::{FetchError, ProfileSource, QualitativeAnalyzer};
