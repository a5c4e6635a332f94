use std::sync::Arc;

use axum::{
    extract::{Json, Query},
    http::StatusCode,
    Extension,
};

use healthmate_domain::services::{create_mock_chat_service, ChatServiceTrait};

use crate::api::auth::AuthSubject;
use crate::api::handlers::chat;
use crate::entities::chat::{HistoryQueryParams, SendMessageRequest};

fn service() -> Extension<Arc<dyn ChatServiceTrait>> {
    Extension(Arc::new(create_mock_chat_service()) as Arc<dyn ChatServiceTrait>)
}

fn subject() -> AuthSubject {
    AuthSubject("subj-1".to_string())
}

#[tokio::test]
async fn send_message_returns_the_stored_exchange() {
    let service = service();

    let response = chat::send_message(
        service.clone(),
        subject(),
        Json(SendMessageRequest {
            message: "Mujhe headache hai".to_string(),
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = chat::get_history(
        service,
        subject(),
        Query(HistoryQueryParams { limit: None }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn empty_message_is_a_bad_request() {
    let response = chat::send_message(
        service(),
        subject(),
        Json(SendMessageRequest {
            message: "   ".to_string(),
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
