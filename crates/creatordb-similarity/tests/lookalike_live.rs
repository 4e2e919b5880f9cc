//! Live tests for `SimilarityService` using `#[sqlx::test]` for the cache
//! store and wiremock for the TEI/Qdrant collaborators.

use chrono::Utc;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use creatordb_core::{
    AnalysisRecord, CampaignGrade, CampaignSuitability, MetricsSnapshot, QualificationReport,
    Tier,
};
use creatordb_db::{find_latest, upsert_latest};
use creatordb_similarity::SimilarityService;

const COLLECTION: &str = "creator_profiles";

fn sample_record(username: &str, embedding: Option<Vec<f32>>) -> AnalysisRecord {
    let grade = CampaignGrade {
        grade: Tier::B,
        score: 55.0,
    };
    AnalysisRecord {
        username: username.to_string(),
        analyzed_at: Utc::now(),
        metrics: MetricsSnapshot {
            total_er: 2.4,
            feed_er: 2.4,
            reels_er: 0.0,
            avg_likes: 120.0,
            avg_comments: 8.0,
            avg_views: 0.0,
            authenticity_score: 88.0,
            bot_ratio: 12.0,
            is_fake: false,
            purchase_keyword_ratio: 6.5,
            is_active: true,
            avg_upload_cycle_days: Some(4),
            market_suitable: true,
            campaign: CampaignSuitability {
                sponsorship: grade,
                paid_ad: grade,
                co_purchase: grade,
            },
            tier: Tier::B,
        },
        trend: None,
        qualification: QualificationReport {
            criteria: vec![],
            qualified: true,
        },
        qualitative: json!({"tier": "B", "grade": "Rising", "category": "food",
                            "basicStats": {"followers": 12_000}}),
        embedding,
    }
}

fn service(pool: sqlx::PgPool, server: &MockServer) -> SimilarityService {
    SimilarityService::new(pool, &server.uri(), &server.uri(), COLLECTION)
}

#[sqlx::test(migrations = "../../migrations")]
async fn unanalyzed_target_is_target_not_found(pool: sqlx::PgPool) {
    let server = MockServer::start().await;
    let service = service(pool, &server);

    let result = service.find_similar("never_seen", 0.8, 10).await;
    let err = result.expect_err("must fail");
    assert_eq!(err.code(), "TARGET_NOT_FOUND");
}

#[sqlx::test(migrations = "../../migrations")]
async fn generation_failure_without_cached_vector_is_no_embedding(pool: sqlx::PgPool) {
    let server = MockServer::start().await;

    // TEI is down; the record has no stored embedding.
    Mock::given(method("POST"))
        .and(path("/embed"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    upsert_latest(&pool, &sample_record("no_vector", None))
        .await
        .expect("seed record");

    let service = service(pool, &server);
    let result = service.find_similar("no_vector", 0.8, 10).await;
    let err = result.expect_err("must fail");
    assert_eq!(err.code(), "NO_EMBEDDING");
}

#[sqlx::test(migrations = "../../migrations")]
async fn results_exclude_target_and_sort_descending(pool: sqlx::PgPool) {
    let server = MockServer::start().await;

    // The record already carries a vector, so TEI is never called. The
    // store replies with an out-of-order result set that still contains the
    // target (a point written before the payload filter existed).
    Mock::given(method("POST"))
        .and(path(format!("/collections/{COLLECTION}/points/search")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [
                {"id": 1, "score": 0.82, "payload": {"username": "peer_low", "er": 1.1}},
                {"id": 2, "score": 0.99, "payload": {"username": "has_vector", "er": 2.4}},
                {"id": 3, "score": 0.91, "payload": {"username": "peer_high", "er": 2.0}}
            ]
        })))
        .mount(&server)
        .await;

    upsert_latest(&pool, &sample_record("has_vector", Some(vec![0.1, 0.2, 0.3])))
        .await
        .expect("seed record");

    let service = service(pool, &server);
    let lookalikes = service
        .find_similar("has_vector", 0.8, 10)
        .await
        .expect("search should succeed");

    assert_eq!(lookalikes.len(), 2, "target must be excluded");
    assert!(lookalikes.iter().all(|l| l.username != "has_vector"));
    assert_eq!(lookalikes[0].username, "peer_high");
    assert_eq!(lookalikes[1].username, "peer_low");
    assert!(lookalikes[0].similarity >= lookalikes[1].similarity);
}

#[sqlx::test(migrations = "../../migrations")]
async fn lazy_generation_persists_the_vector_onto_the_record(pool: sqlx::PgPool) {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/embed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([[0.4, 0.5, 0.6]])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/collections/{COLLECTION}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": {}})))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(format!("/collections/{COLLECTION}/points")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": {}})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/collections/{COLLECTION}/points/search")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": []})))
        .mount(&server)
        .await;

    upsert_latest(&pool, &sample_record("lazy_vector", None))
        .await
        .expect("seed record");

    let service = SimilarityService::new(pool.clone(), &server.uri(), &server.uri(), COLLECTION);
    let lookalikes = service
        .find_similar("lazy_vector", 0.7, 5)
        .await
        .expect("search should succeed with no hits");
    assert!(lookalikes.is_empty());

    let row = find_latest(&pool, "lazy_vector")
        .await
        .expect("find")
        .expect("row");
    assert_eq!(row.embedding, Some(vec![0.4, 0.5, 0.6]));
}
