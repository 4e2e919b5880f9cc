//! Integration tests for `QdrantClient` against a local wiremock server.

use std::collections::HashMap;

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use creatordb_similarity::{QdrantClient, SimilarityError};

const COLLECTION: &str = "creator_profiles";

#[tokio::test]
async fn ensure_collection_is_a_noop_when_collection_exists() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/collections/{COLLECTION}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": {}})))
        .expect(1)
        .mount(&server)
        .await;

    let client = QdrantClient::new(&server.uri(), COLLECTION);
    client.ensure_collection().await.expect("should be a no-op");
}

#[tokio::test]
async fn ensure_collection_creates_with_cosine_distance_when_missing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/collections/{COLLECTION}")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path(format!("/collections/{COLLECTION}")))
        .and(body_partial_json(json!({"vectors": {"distance": "Cosine"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = QdrantClient::new(&server.uri(), COLLECTION);
    client.ensure_collection().await.expect("should create");
}

#[tokio::test]
async fn ensure_collection_surfaces_create_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/collections/{COLLECTION}")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path(format!("/collections/{COLLECTION}")))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = QdrantClient::new(&server.uri(), COLLECTION);
    let result = client.ensure_collection().await;
    assert!(matches!(result, Err(SimilarityError::Qdrant(_))), "got: {result:?}");
}

#[tokio::test]
async fn upsert_point_puts_to_points_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(format!("/collections/{COLLECTION}/points")))
        .and(body_partial_json(
            json!({"points": [{"payload": {"username": "creator_a"}}]}),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": {}})))
        .expect(1)
        .mount(&server)
        .await;

    let client = QdrantClient::new(&server.uri(), COLLECTION);
    let mut payload = HashMap::new();
    payload.insert("username".to_string(), json!("creator_a"));
    client
        .upsert_point("creator_a", vec![0.1, 0.2], payload)
        .await
        .expect("upsert");
}

#[tokio::test]
async fn search_sends_exclusion_filter_and_parses_hits() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/collections/{COLLECTION}/points/search")))
        .and(body_partial_json(json!({
            "score_threshold": 0.8,
            "limit": 5,
            "filter": {"must_not": [{"key": "username", "match": {"value": "target_user"}}]}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [
                {"id": 1, "score": 0.95, "payload": {"username": "creator_b", "er": 2.5}},
                {"id": 2, "score": 0.87, "payload": {"username": "creator_c", "er": 1.9}}
            ]
        })))
        .mount(&server)
        .await;

    let client = QdrantClient::new(&server.uri(), COLLECTION);
    let hits = client
        .search(&[0.1, 0.2], 0.8, 5, "target_user")
        .await
        .expect("search");

    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].score, 0.95);
    assert_eq!(
        hits[0].payload.get("username").and_then(|v| v.as_str()),
        Some("creator_b")
    );
}

#[tokio::test]
async fn search_failure_is_a_backend_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/collections/{COLLECTION}/points/search")))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = QdrantClient::new(&server.uri(), COLLECTION);
    let result = client.search(&[0.1], 0.5, 3, "anyone").await;

    let err = result.expect_err("500 must fail");
    assert_eq!(err.code(), "BACKEND_ERROR");
}
