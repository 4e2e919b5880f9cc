//! Core domain model and configuration for creatordb.
//!
//! Defines the raw scrape shapes (`Profile`, `Post`), the derived analysis
//! shapes (`MetricsSnapshot`, `TrendReport`, `QualificationReport`,
//! `AnalysisRecord`), typed accessors over the opaque qualitative blob, and
//! the env-driven application configuration shared by every binary.

pub mod app_config;
pub mod config;
pub mod qualitative;
pub mod types;

#[cfg(test)]
mod config_test;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env, ConfigError};
pub use types::{
    normalize_username, AnalysisRecord, CampaignGrade, CampaignSuitability, ContentKind,
    Criterion, CriterionResult, ErTrend, MetricsSnapshot, PeriodStats, Post, PostComment,
    Profile, QualificationReport, Tier, TrendReport,
};
