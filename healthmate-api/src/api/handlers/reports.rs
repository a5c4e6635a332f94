use std::sync::Arc;

use axum::{
    extract::{Json, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension,
};
use tracing::{error, info, instrument};

use healthmate_domain::entities::conversions::parse_string_to_uuid;
use healthmate_domain::entities::report::{CreateReportRequest, MedicalReport};
use healthmate_domain::services::{ReportServiceError, ReportServiceTrait};

use crate::api::auth::AuthSubject;
use crate::entities::common::ErrorResponse;
use crate::entities::report::{AnalyzeReportRequest, HealthInsightsResponse, ReportStatsResponse};

/// Map report service errors to API responses
fn error_response(err: ReportServiceError) -> Response {
    match err {
        ReportServiceError::ValidationError(message) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::validation_error(&message, None)),
        )
            .into_response(),
        ReportServiceError::InvalidPayload(message) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(&format!(
                "Invalid file payload: {}",
                message
            ))),
        )
            .into_response(),
        ReportServiceError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found("report")),
        )
            .into_response(),
        ReportServiceError::AlreadyAnalyzed(_) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse::conflict("Report is already analyzed")),
        )
            .into_response(),
        ReportServiceError::ModelError(message) => {
            error!("Model collaborator failure: {}", message);
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse::upstream_error(
                    "The analysis model is currently unavailable",
                )),
            )
                .into_response()
        }
        ReportServiceError::RepositoryError(message) => {
            error!("Report repository failure: {}", message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal_error()),
            )
                .into_response()
        }
    }
}

/// Validate a report id path parameter
fn validated_id(id: &str) -> Result<(), Response> {
    parse_string_to_uuid(id).map(|_| ()).map_err(|message| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(&message)),
        )
            .into_response()
    })
}

/// Register an uploaded report file (analysis pending)
#[utoipa::path(
    post,
    path = "/api/v1/reports",
    request_body = CreateReportRequest,
    responses(
        (status = 201, description = "Report registered", body = MedicalReport),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Missing auth subject", body = ErrorResponse)
    ),
    tag = "reports"
)]
#[instrument(skip(report_service, request))]
pub async fn create_report(
    Extension(report_service): Extension<Arc<dyn ReportServiceTrait>>,
    subject: AuthSubject,
    Json(request): Json<CreateReportRequest>,
) -> Response {
    info!("Registering report for subject {}", subject.as_str());

    match report_service.create_report(subject.as_str(), request).await {
        Ok(report) => (StatusCode::CREATED, Json(report)).into_response(),
        Err(err) => error_response(err),
    }
}

/// List the authenticated user's reports, newest first
#[utoipa::path(
    get,
    path = "/api/v1/reports",
    responses(
        (status = 200, description = "The user's reports", body = Vec<MedicalReport>),
        (status = 401, description = "Missing auth subject", body = ErrorResponse)
    ),
    tag = "reports"
)]
#[instrument(skip(report_service))]
pub async fn list_reports(
    Extension(report_service): Extension<Arc<dyn ReportServiceTrait>>,
    subject: AuthSubject,
) -> Response {
    match report_service.list_reports(subject.as_str()).await {
        Ok(reports) => (StatusCode::OK, Json(reports)).into_response(),
        Err(err) => error_response(err),
    }
}

/// Get one report by id
#[utoipa::path(
    get,
    path = "/api/v1/reports/{id}",
    params(("id" = String, Path, description = "Report identifier")),
    responses(
        (status = 200, description = "The report", body = MedicalReport),
        (status = 400, description = "Invalid report id", body = ErrorResponse),
        (status = 404, description = "Report not found", body = ErrorResponse)
    ),
    tag = "reports"
)]
#[instrument(skip(report_service))]
pub async fn get_report(
    Extension(report_service): Extension<Arc<dyn ReportServiceTrait>>,
    subject: AuthSubject,
    Path(id): Path<String>,
) -> Response {
    if let Err(rejection) = validated_id(&id) {
        return rejection;
    }

    match report_service.get_report(subject.as_str(), &id).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) => error_response(err),
    }
}

/// Delete one report by id
#[utoipa::path(
    delete,
    path = "/api/v1/reports/{id}",
    params(("id" = String, Path, description = "Report identifier")),
    responses(
        (status = 204, description = "Report deleted"),
        (status = 400, description = "Invalid report id", body = ErrorResponse),
        (status = 404, description = "Report not found", body = ErrorResponse)
    ),
    tag = "reports"
)]
#[instrument(skip(report_service))]
pub async fn delete_report(
    Extension(report_service): Extension<Arc<dyn ReportServiceTrait>>,
    subject: AuthSubject,
    Path(id): Path<String>,
) -> Response {
    if let Err(rejection) = validated_id(&id) {
        return rejection;
    }

    info!("Deleting report {} for subject {}", id, subject.as_str());

    match report_service.delete_report(subject.as_str(), &id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

/// Run the AI analysis for a pending report
///
/// The body carries the base64 file bytes; file storage itself is an
/// external collaborator. Analysis happens at most once per report.
#[utoipa::path(
    post,
    path = "/api/v1/reports/{id}/analyze",
    params(("id" = String, Path, description = "Report identifier")),
    request_body = AnalyzeReportRequest,
    responses(
        (status = 200, description = "Analyzed report", body = MedicalReport),
        (status = 400, description = "Invalid id or payload", body = ErrorResponse),
        (status = 404, description = "Report not found", body = ErrorResponse),
        (status = 409, description = "Report already analyzed", body = ErrorResponse)
    ),
    tag = "reports"
)]
#[instrument(skip(report_service, request))]
pub async fn analyze_report(
    Extension(report_service): Extension<Arc<dyn ReportServiceTrait>>,
    subject: AuthSubject,
    Path(id): Path<String>,
    Json(request): Json<AnalyzeReportRequest>,
) -> Response {
    if let Err(rejection) = validated_id(&id) {
        return rejection;
    }

    info!("Analyzing report {} for subject {}", id, subject.as_str());

    match report_service
        .analyze_report(subject.as_str(), &id, &request.file_data)
        .await
    {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) => error_response(err),
    }
}

/// Aggregate dashboard counts for the authenticated user
#[utoipa::path(
    get,
    path = "/api/v1/reports/stats",
    responses(
        (status = 200, description = "Report statistics", body = ReportStatsResponse),
        (status = 401, description = "Missing auth subject", body = ErrorResponse)
    ),
    tag = "reports"
)]
#[instrument(skip(report_service))]
pub async fn report_stats(
    Extension(report_service): Extension<Arc<dyn ReportServiceTrait>>,
    subject: AuthSubject,
) -> Response {
    match report_service.report_stats(subject.as_str()).await {
        Ok(stats) => (StatusCode::OK, Json(ReportStatsResponse::from(stats))).into_response(),
        Err(err) => error_response(err),
    }
}

/// Bilingual trend narrative over the user's analyzed reports
#[utoipa::path(
    get,
    path = "/api/v1/reports/insights",
    responses(
        (status = 200, description = "Generated insights", body = HealthInsightsResponse),
        (status = 502, description = "Model unavailable", body = ErrorResponse)
    ),
    tag = "reports"
)]
#[instrument(skip(report_service))]
pub async fn health_insights(
    Extension(report_service): Extension<Arc<dyn ReportServiceTrait>>,
    subject: AuthSubject,
) -> Response {
    match report_service.health_insights(subject.as_str()).await {
        Ok(insights) => (StatusCode::OK, Json(HealthInsightsResponse { insights })).into_response(),
        Err(err) => error_response(err),
    }
}
