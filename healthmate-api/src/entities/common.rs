use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error response format for the API
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error type/code - machine-readable identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// Create a not found error response
    pub fn not_found(resource: &str) -> Self {
        Self {
            error: "not_found".to_string(),
            message: format!("The requested {} could not be found", resource),
            details: None,
        }
    }

    /// Create a validation error response
    pub fn validation_error(message: &str, details: Option<serde_json::Value>) -> Self {
        Self {
            error: "validation_error".to_string(),
            message: message.to_string(),
            details,
        }
    }

    /// Create a bad request error response
    pub fn bad_request(message: &str) -> Self {
        Self {
            error: "bad_request".to_string(),
            message: message.to_string(),
            details: None,
        }
    }

    /// Create an unauthorized error response
    pub fn unauthorized() -> Self {
        Self {
            error: "unauthorized".to_string(),
            message: "Missing or invalid authentication subject".to_string(),
            details: None,
        }
    }

    /// Create a conflict error response
    pub fn conflict(message: &str) -> Self {
        Self {
            error: "conflict".to_string(),
            message: message.to_string(),
            details: None,
        }
    }

    /// Create an upstream (model collaborator) error response
    pub fn upstream_error(message: &str) -> Self {
        Self {
            error: "upstream_error".to_string(),
            message: message.to_string(),
            details: None,
        }
    }

    /// Create an internal error response
    pub fn internal_error() -> Self {
        Self {
            error: "internal_error".to_string(),
            message: "An unexpected error occurred".to_string(),
            details: None,
        }
    }
}
