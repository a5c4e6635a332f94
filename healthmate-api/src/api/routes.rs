use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::debug;

use healthmate_domain::health::{create_default_health_service, HealthServiceTrait};
use healthmate_domain::services::{
    create_default_chat_service, create_default_profile_service, create_default_report_service,
    ChatServiceTrait, ProfileServiceTrait, ReportServiceTrait,
};

use crate::api::handlers::{chat, health, profile, reports};
use crate::openapi::configure_swagger_routes;

/// Create the application router with explicitly supplied services
///
/// Tests inject mock-backed services here; `create_app` wires the defaults.
pub fn create_app_with_services(
    profile_service: Arc<dyn ProfileServiceTrait>,
    report_service: Arc<dyn ReportServiceTrait>,
    chat_service: Arc<dyn ChatServiceTrait>,
    health_service: Arc<dyn HealthServiceTrait>,
) -> Router {
    debug!("Creating application router");

    // Define specific routes before parametrized routes to avoid conflicts
    let api_routes = Router::new()
        .route("/profile/sync", post(profile::sync_profile))
        .route("/profile/metrics", get(profile::get_health_metrics))
        .route("/profile/summary", get(profile::get_health_summary))
        .route(
            "/profile",
            get(profile::get_profile)
                .put(profile::update_profile)
                .delete(profile::delete_profile),
        )
        .route("/reports/stats", get(reports::report_stats))
        .route("/reports/insights", get(reports::health_insights))
        .route(
            "/reports",
            post(reports::create_report).get(reports::list_reports),
        )
        .route(
            "/reports/:id",
            get(reports::get_report).delete(reports::delete_report),
        )
        .route("/reports/:id/analyze", post(reports::analyze_report))
        .route("/chat", post(chat::send_message))
        .route(
            "/chat/history",
            get(chat::get_history).delete(chat::clear_history),
        );

    debug!("API routes configured");

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(configure_swagger_routes())
        .route("/health", get(health::health_check))
        .nest("/api/v1", api_routes)
        .layer(Extension(profile_service))
        .layer(Extension(report_service))
        .layer(Extension(chat_service))
        .layer(Extension(health_service))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Create the application router with the default services
pub async fn create_app() -> Router {
    let profile_service: Arc<dyn ProfileServiceTrait> =
        Arc::new(create_default_profile_service());
    let report_service: Arc<dyn ReportServiceTrait> = Arc::new(create_default_report_service());
    let chat_service: Arc<dyn ChatServiceTrait> = Arc::new(create_default_chat_service());
    let health_service: Arc<dyn HealthServiceTrait> = Arc::new(create_default_health_service());

    create_app_with_services(profile_service, report_service, chat_service, health_service)
}
