//! Authenticated subject extraction
//!
//! Authentication itself is handled by the gateway in front of this service;
//! requests arrive with the verified subject id in the `x-auth-subject`
//! header. The extractor rejects requests without it.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::entities::common::ErrorResponse;

/// Header carrying the verified subject id, set by the auth gateway
pub const AUTH_SUBJECT_HEADER: &str = "x-auth-subject";

/// The authenticated subject id for the current request
#[derive(Debug, Clone)]
pub struct AuthSubject(pub String);

impl AuthSubject {
    /// The opaque subject id string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthSubject
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let subject = parts
            .headers
            .get(AUTH_SUBJECT_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|subject| !subject.is_empty());

        match subject {
            Some(subject) => Ok(AuthSubject(subject.to_string())),
            None => Err((
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::unauthorized()),
            )
                .into_response()),
        }
    }
}
