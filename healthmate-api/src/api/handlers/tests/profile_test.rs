use std::sync::Arc;

use axum::{extract::Json, http::StatusCode, Extension};

use healthmate_domain::entities::profile::UpsertProfileRequest;
use healthmate_domain::services::{create_mock_profile_service, ProfileServiceTrait};

use crate::api::auth::AuthSubject;
use crate::api::handlers::profile;

fn service() -> Extension<Arc<dyn ProfileServiceTrait>> {
    Extension(Arc::new(create_mock_profile_service()) as Arc<dyn ProfileServiceTrait>)
}

fn subject() -> AuthSubject {
    AuthSubject("subj-1".to_string())
}

#[tokio::test]
async fn sync_then_get_round_trips() {
    let service = service();

    let request = UpsertProfileRequest {
        full_name: Some("Ayesha Khan".to_string()),
        age: Some(34),
        height_cm: Some(165.0),
        weight_kg: Some(70.0),
        ..Default::default()
    };

    let response = profile::sync_profile(service.clone(), subject(), Json(request)).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = profile::get_profile(service, subject()).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn get_without_profile_is_not_found() {
    let response = profile::get_profile(service(), subject()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_age_is_a_bad_request() {
    let request = UpsertProfileRequest {
        age: Some(0),
        ..Default::default()
    };

    let response = profile::sync_profile(service(), subject(), Json(request)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
