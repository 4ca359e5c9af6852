//! Error taxonomy for request handling
//!
//! Four failure classes, each with its own HTTP mapping: missing request
//! fields (client error), completion-service failures (including the
//! terminal quota error after retry exhaustion), malformed structured
//! output from the model, and everything else. Persistence failures never
//! surface here; they are logged and swallowed at the call site.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::llm::CompletionError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error(transparent)]
    Completion(#[from] CompletionError),

    #[error("Invalid assumptions from completion service: {0}")]
    AssumptionParse(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingField(_) => StatusCode::BAD_REQUEST,
            ApiError::Completion(CompletionError::QuotaExceeded { .. }) => {
                StatusCode::TOO_MANY_REQUESTS
            }
            ApiError::Completion(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::AssumptionParse(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_is_client_error() {
        let err = ApiError::MissingField("topic");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Missing required field: topic");
    }

    #[test]
    fn test_quota_maps_to_429() {
        let err = ApiError::Completion(CompletionError::QuotaExceeded { attempts: 3 });
        assert_eq!(err.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_parse_error_maps_to_422() {
        let err = ApiError::AssumptionParse("not json".to_string());
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
