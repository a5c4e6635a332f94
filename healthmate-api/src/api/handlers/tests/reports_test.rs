use std::sync::Arc;

use axum::{
    extract::{Json, Path},
    http::StatusCode,
    Extension,
};

use healthmate_data::gemini::mock::MockAnalysisModel;
use healthmate_data::repository::MockReportRepository;
use healthmate_domain::entities::report::{CreateReportRequest, ReportType};
use healthmate_domain::services::report::ReportService;
use healthmate_domain::services::ReportServiceTrait;
use healthmate_domain::testing::sample_analysis_response;

use crate::api::auth::AuthSubject;
use crate::api::handlers::reports;
use crate::entities::report::AnalyzeReportRequest;

fn service_with_model(model: MockAnalysisModel) -> Extension<Arc<dyn ReportServiceTrait>> {
    Extension(Arc::new(ReportService::new(MockReportRepository::new(), model))
        as Arc<dyn ReportServiceTrait>)
}

fn subject() -> AuthSubject {
    AuthSubject("subj-1".to_string())
}

fn create_request() -> CreateReportRequest {
    CreateReportRequest {
        report_file_url: "https://files.example/reports/cbc.jpg".to_string(),
        report_file_name: "cbc.jpg".to_string(),
        report_file_type: Some("image/jpeg".to_string()),
        report_type: Some(ReportType::BloodTest),
        report_notes: None,
    }
}

#[tokio::test]
async fn analyze_with_working_model_returns_the_normalized_record() {
    let service =
        service_with_model(MockAnalysisModel::new().with_response(sample_analysis_response()));

    // Create through the service so we know the id
    let created = {
        let Extension(inner) = service.clone();
        inner.create_report("subj-1", create_request()).await.unwrap()
    };

    let response = reports::analyze_report(
        service,
        subject(),
        Path(created.id.clone()),
        Json(AnalyzeReportRequest {
            file_data: "QUJD".to_string(),
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn analyzing_a_missing_report_is_not_found() {
    let service = service_with_model(MockAnalysisModel::new().with_failure());

    let response = reports::analyze_report(
        service,
        subject(),
        Path("8c0f64e9-2a7a-4a40-9a6c-4f8b6f9d2f11".to_string()),
        Json(AnalyzeReportRequest {
            file_data: "QUJD".to_string(),
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn stats_for_a_fresh_user_are_empty() {
    let service = service_with_model(MockAnalysisModel::new().with_failure());

    let response = reports::report_stats(service, subject()).await;
    assert_eq!(response.status(), StatusCode::OK);
}
