use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Configure Swagger UI endpoints
pub fn configure_swagger_routes() -> SwaggerUi {
    SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}

// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::api::handlers::health::health_check,

        // Profile endpoints
        crate::api::handlers::profile::sync_profile,
        crate::api::handlers::profile::get_profile,
        crate::api::handlers::profile::update_profile,
        crate::api::handlers::profile::delete_profile,
        crate::api::handlers::profile::get_health_metrics,
        crate::api::handlers::profile::get_health_summary,

        // Report endpoints
        crate::api::handlers::reports::create_report,
        crate::api::handlers::reports::list_reports,
        crate::api::handlers::reports::get_report,
        crate::api::handlers::reports::delete_report,
        crate::api::handlers::reports::analyze_report,
        crate::api::handlers::reports::report_stats,
        crate::api::handlers::reports::health_insights,

        // Chat endpoints
        crate::api::handlers::chat::send_message,
        crate::api::handlers::chat::get_history,
        crate::api::handlers::chat::clear_history,
    ),
    components(
        schemas(
            // Common entities
            crate::entities::common::ErrorResponse,

            // Health handlers
            crate::api::handlers::health::HealthResponse,
            crate::api::handlers::health::ComponentStatus,
            crate::api::handlers::health::ComponentHealthStatus,

            // Profile schemas
            healthmate_domain::entities::profile::HealthProfile,
            healthmate_domain::entities::profile::UpsertProfileRequest,
            healthmate_domain::entities::profile::HealthSummary,
            healthmate_domain::entities::profile::BasicInfo,
            healthmate_domain::entities::profile::VitalsInfo,
            healthmate_domain::entities::profile::MedicalInfo,
            healthmate_domain::entities::profile::LifestyleInfo,
            healthmate_domain::entities::metrics::HealthMetrics,
            healthmate_domain::entities::metrics::BmiCategory,
            healthmate_domain::entities::metrics::BloodPressureCategory,
            healthmate_domain::entities::metrics::BloodSugarCategory,
            healthmate_domain::entities::metrics::CholesterolCategory,

            // Report schemas
            healthmate_domain::entities::report::MedicalReport,
            healthmate_domain::entities::report::CreateReportRequest,
            healthmate_domain::entities::report::AiAnalysis,
            healthmate_domain::entities::report::ReportType,
            healthmate_domain::entities::report::RiskLevel,
            crate::entities::report::AnalyzeReportRequest,
            crate::entities::report::ReportStatsResponse,
            crate::entities::report::HealthInsightsResponse,

            // Chat schemas
            healthmate_domain::entities::chat::ChatMessage,
            healthmate_domain::entities::chat::Topic,
            crate::entities::chat::SendMessageRequest,
            crate::entities::chat::HistoryQueryParams,
            crate::entities::chat::ClearHistoryResponse,
        )
    ),
    tags(
        (name = "health", description = "Service health checks"),
        (name = "profile", description = "Health profile management"),
        (name = "reports", description = "Medical reports and AI analysis"),
        (name = "chat", description = "Health assistant chat")
    )
)]
pub struct ApiDoc;
