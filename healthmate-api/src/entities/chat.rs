use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Request payload for sending a chat message
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SendMessageRequest {
    /// The user's message text
    pub message: String,
}

/// Query parameters for retrieving chat history
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct HistoryQueryParams {
    /// Maximum number of exchanges to return (default: 50)
    pub limit: Option<usize>,
}

/// Response for clearing chat history
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClearHistoryResponse {
    /// Number of exchanges removed
    pub removed: usize,
}
