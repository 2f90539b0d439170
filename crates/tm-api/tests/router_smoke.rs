use std::path::Path;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use tm_api::store::InMemoryDirectory;
use tm_api::{build_state, create_router};

fn seeded_router() -> axum::Router {
    let seed = Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata/catalog.json");
    let directory = InMemoryDirectory::from_path(&seed).expect("seed catalog should parse");
    create_router(build_state(Arc::new(directory)))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_endpoints_respond() {
    let app = seeded_router();

    for uri in ["/livez", "/readyz", "/health"] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
    }
}

#[tokio::test]
async fn recommendations_exclude_ineligible_and_rank_by_score() {
    let app = seeded_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/candidates/1/recommendations?today=2026-08-30")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    assert_eq!(json["candidate_id"], 1);
    assert_eq!(json["completeness_pct"], 100.0);

    let ids: Vec<i64> = json["recommendations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["job_id"].as_i64().unwrap())
        .collect();

    // 12 is past deadline, 13 is paused, 14 was applied to.
    assert_eq!(ids, vec![10, 11]);

    let scores: Vec<f64> = json["recommendations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["total_score"].as_f64().unwrap())
        .collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));

    let breakdown = &json["recommendations"][0]["breakdown"];
    assert_eq!(breakdown["skills"]["status"], "PERFECT_MATCH");
    assert!(breakdown["skills"]["details"].as_str().unwrap().contains("matched"));
}

#[tokio::test]
async fn limit_caps_the_result_list() {
    let app = seeded_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/candidates/1/recommendations?today=2026-08-30&limit=1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let json = body_json(response).await;
    assert_eq!(json["recommendations"].as_array().unwrap().len(), 1);
    assert_eq!(json["recommendations"][0]["job_id"], 10);
}

#[tokio::test]
async fn unknown_candidate_is_distinct_not_found() {
    let app = seeded_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/candidates/999/recommendations")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "not_found");
}

#[tokio::test]
async fn rank_puts_premium_candidates_first() {
    let app = seeded_router();

    // Candidate 2 has an active pro subscription; candidate 3's boost
    // expired yesterday; candidate 1 has nothing. Newest-first would put
    // 3 then 1 then 2 without the tier overlay.
    let body = serde_json::json!({
        "candidate_ids": [1, 2, 3],
        "sort": "newest_first",
        "now": "2026-08-30T12:00:00Z"
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/candidates/rank")
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    let order: Vec<(i64, bool)> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|item| {
            (
                item["candidate_id"].as_i64().unwrap(),
                item["is_premium"].as_bool().unwrap(),
            )
        })
        .collect();

    assert_eq!(order, vec![(2, true), (3, false), (1, false)]);
}

#[tokio::test]
async fn malformed_query_is_bad_request() {
    let app = seeded_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/candidates/1/recommendations?today=not-a-date")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
