use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::{json, Value as JsonValue};

use crate::services::github::UpstreamError;

/// Errors returned by the `/api` handlers, rendered as `{ "error": ... }`
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("GitHub API error")]
    Upstream { details: JsonValue },

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn user_not_found() -> Self {
        Self::NotFound("User not found".to_string())
    }
}

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Status { details, .. } | UpstreamError::GraphQl(details) => {
                ApiError::Upstream { details }
            }
            UpstreamError::UserNotFound => ApiError::user_not_found(),
            UpstreamError::Transport(e) => ApiError::Internal(e.to_string()),
            UpstreamError::Malformed(message) => ApiError::Internal(message),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(format!("{:#}", err))
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ApiError::BadRequest(message) | ApiError::NotFound(message) => {
                json!({ "error": message })
            }
            ApiError::Upstream { details } => json!({
                "error": "GitHub API error",
                "details": details,
            }),
            ApiError::Internal(details) => json!({
                "error": "Internal server error",
                "details": details,
            }),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}
