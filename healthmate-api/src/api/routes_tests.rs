use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use healthmate_domain::health::{create_default_health_service, HealthServiceTrait};
use healthmate_domain::services::{
    create_mock_chat_service, create_mock_profile_service, create_mock_report_service,
    ChatServiceTrait, ProfileServiceTrait, ReportServiceTrait,
};

use crate::api::auth::AUTH_SUBJECT_HEADER;
use crate::api::routes::create_app_with_services;

/// Router over mock-backed services (no database, canned model)
fn test_app() -> Router {
    let profile_service: Arc<dyn ProfileServiceTrait> = Arc::new(create_mock_profile_service());
    let report_service: Arc<dyn ReportServiceTrait> = Arc::new(create_mock_report_service());
    let chat_service: Arc<dyn ChatServiceTrait> = Arc::new(create_mock_chat_service());
    let health_service: Arc<dyn HealthServiceTrait> = Arc::new(create_default_health_service());

    create_app_with_services(profile_service, report_service, chat_service, health_service)
}

fn authed_request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(AUTH_SUBJECT_HEADER, "subj-1")
        .header("content-type", "application/json");

    match body {
        Some(body) => builder.body(Body::from(body.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn requests_without_subject_header_are_unauthorized() {
    let app = test_app();

    let request = Request::builder()
        .method("GET")
        .uri("/api/v1/profile")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn profile_sync_derives_bmi_and_metrics_follow() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(authed_request(
            "POST",
            "/api/v1/profile/sync",
            Some(json!({
                "full_name": "Ayesha Khan",
                "age": 34,
                "height_cm": 170.0,
                "weight_kg": 65.0,
                "blood_pressure_systolic": 125,
                "blood_pressure_diastolic": 79
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let profile = body_json(response).await;
    assert_eq!(profile["bmi"], 22.5);

    let response = app
        .clone()
        .oneshot(authed_request("GET", "/api/v1/profile/metrics", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let metrics = body_json(response).await;
    assert_eq!(metrics["bmi_category"], "Normal");
    assert_eq!(metrics["blood_pressure"], "Elevated");
}

#[tokio::test]
async fn profile_get_before_sync_is_not_found() {
    let app = test_app();

    let response = app
        .oneshot(authed_request("GET", "/api/v1/profile", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn report_analysis_applies_once_and_shows_in_stats() {
    let app = test_app();

    // Register the uploaded file
    let response = app
        .clone()
        .oneshot(authed_request(
            "POST",
            "/api/v1/reports",
            Some(json!({
                "report_file_url": "https://files.example/reports/cbc.jpg",
                "report_file_name": "cbc.jpg",
                "report_file_type": "image/jpeg",
                "report_type": "blood-test"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let report = body_json(response).await;
    assert_eq!(report["ai_analyzed"], false);
    let id = report["id"].as_str().unwrap().to_string();

    // The mock model fails, so the analysis lands on the fallback — still a
    // complete record with risk level low
    let analyze_uri = format!("/api/v1/reports/{}/analyze", id);
    let response = app
        .clone()
        .oneshot(authed_request(
            "POST",
            &analyze_uri,
            Some(json!({ "file_data": "QUJD" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let analyzed = body_json(response).await;
    assert_eq!(analyzed["ai_analyzed"], true);
    assert_eq!(analyzed["analysis"]["risk_level"], "low");
    assert!(analyzed["analysis"]["summary_urdu"]
        .as_str()
        .unwrap()
        .contains("upload ho gayi hai"));

    // A second attempt conflicts
    let response = app
        .clone()
        .oneshot(authed_request(
            "POST",
            &analyze_uri,
            Some(json!({ "file_data": "QUJD" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Stats reflect the transition
    let response = app
        .clone()
        .oneshot(authed_request("GET", "/api/v1/reports/stats", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let stats = body_json(response).await;
    assert_eq!(stats["total"], 1);
    assert_eq!(stats["analyzed"], 1);
    assert_eq!(stats["pending"], 0);
}

#[tokio::test]
async fn report_with_malformed_id_is_a_bad_request() {
    let app = test_app();

    let response = app
        .oneshot(authed_request("GET", "/api/v1/reports/not-a-uuid", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn chat_round_trip_and_clear() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(authed_request(
            "POST",
            "/api/v1/chat",
            Some(json!({ "message": "I can't sleep well" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let exchange = body_json(response).await;
    assert_eq!(exchange["topic"], "sleep");
    assert!(!exchange["ai_response"].as_str().unwrap().is_empty());

    let response = app
        .clone()
        .oneshot(authed_request("GET", "/api/v1/chat/history", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let history = body_json(response).await;
    assert_eq!(history.as_array().unwrap().len(), 1);

    let response = app
        .clone()
        .oneshot(authed_request("DELETE", "/api/v1/chat/history", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cleared = body_json(response).await;
    assert_eq!(cleared["removed"], 1);
}

#[tokio::test]
async fn health_endpoint_reports_degraded_without_database() {
    let app = test_app();

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    // No pool is initialized in tests, so the database component degrades
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = body_json(response).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["components"]["api"]["status"], "ok");
}
