//! Domain error → HTTP response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use workpad_application::tools::payload::ErrorBody;
use workpad_domain::WorkpadError;

/// Transport-level error wrapper for route handlers.
#[derive(Debug)]
pub enum ApiError {
    Domain(WorkpadError),
    /// A request the transport itself rejects (e.g. an unknown event kind
    /// in a subscription query).
    BadRequest(String),
}

impl From<WorkpadError> for ApiError {
    fn from(error: WorkpadError) -> Self {
        ApiError::Domain(error)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Domain(error) => match error {
                WorkpadError::MissingSessionId | WorkpadError::InvalidSessionIdFormat { .. } => {
                    StatusCode::BAD_REQUEST
                }
                // Distinct from NOT_FOUND so callers can tell "never
                // existed" from "aged out".
                WorkpadError::SessionExpired { .. } => StatusCode::GONE,
                WorkpadError::SessionNotFound { .. }
                | WorkpadError::SectionNotFound { .. }
                | WorkpadError::TaskNotFound { .. }
                | WorkpadError::QuestionNotFound { .. } => StatusCode::NOT_FOUND,
                WorkpadError::InvalidDependency { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                WorkpadError::AlreadyAnswered { .. } => StatusCode::CONFLICT,
            },
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Domain(error) => ErrorBody::from(error),
            ApiError::BadRequest(message) => ErrorBody {
                error: message.clone(),
                kind: "bad_request".to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}
