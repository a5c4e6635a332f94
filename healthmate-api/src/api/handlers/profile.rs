use std::sync::Arc;

use axum::{
    extract::Json,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension,
};
use tracing::{error, info, instrument};

use healthmate_domain::entities::metrics::HealthMetrics;
use healthmate_domain::entities::profile::{HealthProfile, HealthSummary, UpsertProfileRequest};
use healthmate_domain::services::{ProfileServiceError, ProfileServiceTrait};

use crate::api::auth::AuthSubject;
use crate::entities::common::ErrorResponse;

/// Map profile service errors to API responses
fn error_response(err: ProfileServiceError) -> Response {
    match err {
        ProfileServiceError::ValidationError(message) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::validation_error(&message, None)),
        )
            .into_response(),
        ProfileServiceError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found("profile")),
        )
            .into_response(),
        ProfileServiceError::RepositoryError(message) => {
            error!("Profile repository failure: {}", message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal_error()),
            )
                .into_response()
        }
    }
}

/// One-time profile creation after registration
#[utoipa::path(
    post,
    path = "/api/v1/profile/sync",
    request_body = UpsertProfileRequest,
    responses(
        (status = 201, description = "Profile created", body = HealthProfile),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Missing auth subject", body = ErrorResponse)
    ),
    tag = "profile"
)]
#[instrument(skip(profile_service, request))]
pub async fn sync_profile(
    Extension(profile_service): Extension<Arc<dyn ProfileServiceTrait>>,
    subject: AuthSubject,
    Json(request): Json<UpsertProfileRequest>,
) -> Response {
    info!("Syncing profile for subject {}", subject.as_str());

    match profile_service.upsert_profile(subject.as_str(), request).await {
        Ok(profile) => (StatusCode::CREATED, Json(profile)).into_response(),
        Err(err) => error_response(err),
    }
}

/// Get the authenticated user's profile
#[utoipa::path(
    get,
    path = "/api/v1/profile",
    responses(
        (status = 200, description = "The stored profile", body = HealthProfile),
        (status = 404, description = "No profile yet", body = ErrorResponse),
        (status = 401, description = "Missing auth subject", body = ErrorResponse)
    ),
    tag = "profile"
)]
#[instrument(skip(profile_service))]
pub async fn get_profile(
    Extension(profile_service): Extension<Arc<dyn ProfileServiceTrait>>,
    subject: AuthSubject,
) -> Response {
    match profile_service.get_profile(subject.as_str()).await {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(err) => error_response(err),
    }
}

/// Edit the authenticated user's profile
#[utoipa::path(
    put,
    path = "/api/v1/profile",
    request_body = UpsertProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = HealthProfile),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Missing auth subject", body = ErrorResponse)
    ),
    tag = "profile"
)]
#[instrument(skip(profile_service, request))]
pub async fn update_profile(
    Extension(profile_service): Extension<Arc<dyn ProfileServiceTrait>>,
    subject: AuthSubject,
    Json(request): Json<UpsertProfileRequest>,
) -> Response {
    match profile_service.upsert_profile(subject.as_str(), request).await {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(err) => error_response(err),
    }
}

/// Delete the authenticated user's profile (administrative)
#[utoipa::path(
    delete,
    path = "/api/v1/profile",
    responses(
        (status = 204, description = "Profile deleted"),
        (status = 404, description = "No profile to delete", body = ErrorResponse),
        (status = 401, description = "Missing auth subject", body = ErrorResponse)
    ),
    tag = "profile"
)]
#[instrument(skip(profile_service))]
pub async fn delete_profile(
    Extension(profile_service): Extension<Arc<dyn ProfileServiceTrait>>,
    subject: AuthSubject,
) -> Response {
    info!("Deleting profile for subject {}", subject.as_str());

    match profile_service.delete_profile(subject.as_str()).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

/// Derived metric categories for the stored vitals
#[utoipa::path(
    get,
    path = "/api/v1/profile/metrics",
    responses(
        (status = 200, description = "Derived metrics", body = HealthMetrics),
        (status = 404, description = "No profile yet", body = ErrorResponse),
        (status = 401, description = "Missing auth subject", body = ErrorResponse)
    ),
    tag = "profile"
)]
#[instrument(skip(profile_service))]
pub async fn get_health_metrics(
    Extension(profile_service): Extension<Arc<dyn ProfileServiceTrait>>,
    subject: AuthSubject,
) -> Response {
    match profile_service.get_health_metrics(subject.as_str()).await {
        Ok(metrics) => (StatusCode::OK, Json(metrics)).into_response(),
        Err(err) => error_response(err),
    }
}

/// Grouped profile view for the dashboard
#[utoipa::path(
    get,
    path = "/api/v1/profile/summary",
    responses(
        (status = 200, description = "Grouped summary", body = HealthSummary),
        (status = 404, description = "No profile yet", body = ErrorResponse),
        (status = 401, description = "Missing auth subject", body = ErrorResponse)
    ),
    tag = "profile"
)]
#[instrument(skip(profile_service))]
pub async fn get_health_summary(
    Extension(profile_service): Extension<Arc<dyn ProfileServiceTrait>>,
    subject: AuthSubject,
) -> Response {
    match profile_service.get_health_summary(subject.as_str()).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(err) => error_response(err),
    }
}
