//! Offline unit tests for creatordb-db pool configuration and row types.
//! These tests do not require a live database connection.

use chrono::Utc;
use creatordb_core::{AppConfig, Environment};
use creatordb_db::{AnalysisRecordRow, PoolConfig};
use serde_json::json;

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        log_level: "info".to_string(),
        tei_url: "http://localhost:8080".to_string(),
        qdrant_url: "http://localhost:6333".to_string(),
        qdrant_collection: "creator_profiles".to_string(),
        cache_freshness_hours: 24,
        activity_window_days: 30,
        fetch_timeout_secs: 30,
        enrich_retry_backoff_ms: 500,
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

/// Compile-time smoke test: confirm that [`AnalysisRecordRow`] has all
/// expected fields with the correct types. No database required.
#[test]
fn analysis_record_row_has_expected_fields() {
    let now = Utc::now();
    let row = AnalysisRecordRow {
        id: 1_i64,
        username: "some_creator".to_string(),
        analyzed_at: now,
        metrics: json!({}),
        trend: None,
        qualification: json!({}),
        qualitative: serde_json::Value::Null,
        embedding: Some(vec![0.1_f32, 0.2, 0.3]),
        created_at: now,
        updated_at: now,
    };

    assert_eq!(row.id, 1);
    assert_eq!(row.username, "some_creator");
    assert!(row.trend.is_none());
    assert_eq!(row.embedding.as_deref(), Some(&[0.1_f32, 0.2, 0.3][..]));
}

#[test]
fn corrupt_metrics_payload_surfaces_as_typed_error() {
    let now = Utc::now();
    let row = AnalysisRecordRow {
        id: 7,
        username: "some_creator".to_string(),
        analyzed_at: now,
        // Not a MetricsSnapshot shape.
        metrics: json!({"unexpected": true}),
        trend: None,
        qualification: json!({"criteria": [], "qualified": true}),
        qualitative: serde_json::Value::Null,
        embedding: None,
        created_at: now,
        updated_at: now,
    };

    let result = row.into_record();
    assert!(
        matches!(result, Err(creatordb_db::DbError::Corrupt { ref context, .. })
            if context.contains("metrics")),
        "expected Corrupt(metrics), got: {result:?}"
    );
}
