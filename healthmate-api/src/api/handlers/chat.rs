use std::sync::Arc;

use axum::{
    extract::{Json, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension,
};
use tracing::{error, info, instrument};

use healthmate_domain::entities::chat::ChatMessage;
use healthmate_domain::services::{ChatServiceError, ChatServiceTrait};

use crate::api::auth::AuthSubject;
use crate::entities::chat::{ClearHistoryResponse, HistoryQueryParams, SendMessageRequest};
use crate::entities::common::ErrorResponse;

/// Map chat service errors to API responses
fn error_response(err: ChatServiceError) -> Response {
    match err {
        ChatServiceError::ValidationError(message) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::validation_error(&message, None)),
        )
            .into_response(),
        ChatServiceError::ModelError(message) => {
            error!("Chat model failure: {}", message);
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse::upstream_error(
                    "The chat assistant is currently unavailable",
                )),
            )
                .into_response()
        }
        ChatServiceError::RepositoryError(message) => {
            error!("Chat repository failure: {}", message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal_error()),
            )
                .into_response()
        }
    }
}

/// Send a message to the health assistant
///
/// Builds the health-context system prompt, forwards the stored history,
/// persists the exchange and returns it.
#[utoipa::path(
    post,
    path = "/api/v1/chat",
    request_body = SendMessageRequest,
    responses(
        (status = 201, description = "The stored exchange", body = ChatMessage),
        (status = 400, description = "Empty message", body = ErrorResponse),
        (status = 502, description = "Model unavailable", body = ErrorResponse)
    ),
    tag = "chat"
)]
#[instrument(skip(chat_service, request))]
pub async fn send_message(
    Extension(chat_service): Extension<Arc<dyn ChatServiceTrait>>,
    subject: AuthSubject,
    Json(request): Json<SendMessageRequest>,
) -> Response {
    info!("Chat message from subject {}", subject.as_str());

    match chat_service
        .send_message(subject.as_str(), &request.message)
        .await
    {
        Ok(exchange) => (StatusCode::CREATED, Json(exchange)).into_response(),
        Err(err) => error_response(err),
    }
}

/// Chat history for the authenticated user, oldest first
#[utoipa::path(
    get,
    path = "/api/v1/chat/history",
    params(HistoryQueryParams),
    responses(
        (status = 200, description = "Stored exchanges", body = Vec<ChatMessage>),
        (status = 401, description = "Missing auth subject", body = ErrorResponse)
    ),
    tag = "chat"
)]
#[instrument(skip(chat_service))]
pub async fn get_history(
    Extension(chat_service): Extension<Arc<dyn ChatServiceTrait>>,
    subject: AuthSubject,
    Query(params): Query<HistoryQueryParams>,
) -> Response {
    match chat_service
        .get_history(subject.as_str(), params.limit)
        .await
    {
        Ok(history) => (StatusCode::OK, Json(history)).into_response(),
        Err(err) => error_response(err),
    }
}

/// Clear the authenticated user's chat history in one bulk operation
#[utoipa::path(
    delete,
    path = "/api/v1/chat/history",
    responses(
        (status = 200, description = "History cleared", body = ClearHistoryResponse),
        (status = 401, description = "Missing auth subject", body = ErrorResponse)
    ),
    tag = "chat"
)]
#[instrument(skip(chat_service))]
pub async fn clear_history(
    Extension(chat_service): Extension<Arc<dyn ChatServiceTrait>>,
    subject: AuthSubject,
) -> Response {
    info!("Clearing chat history for subject {}", subject.as_str());

    match chat_service.clear_history(subject.as_str()).await {
        Ok(removed) => (StatusCode::OK, Json(ClearHistoryResponse { removed })).into_response(),
        Err(err) => error_response(err),
    }
}
