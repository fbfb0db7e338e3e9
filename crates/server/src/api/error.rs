//! API 错误类型与响应映射。

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use reviewhub_api_types::ErrorResponse;
use reviewhub_core::domain::Denial;
use thiserror::Error;
use tracing::error;

use crate::media::MediaError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidState(String),

    #[error("{0}")]
    Upstream(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            ApiError::Conflict(_) => (StatusCode::BAD_REQUEST, "conflict"),
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
            ApiError::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::InvalidState(_) => (StatusCode::BAD_REQUEST, "invalid_state"),
            ApiError::Upstream(_) => (StatusCode::INTERNAL_SERVER_ERROR, "upstream_error"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            ApiError::Internal(err) => {
                error!(error = ?err, "internal error while handling request");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(ErrorResponse {
            code: code.to_string(),
            message,
        });
        (status, body).into_response()
    }
}

impl From<Denial> for ApiError {
    fn from(denial: Denial) -> Self {
        match denial {
            Denial::Forbidden(reason) => ApiError::Forbidden(reason.to_string()),
            Denial::InvalidState(reason) => ApiError::InvalidState(reason.to_string()),
        }
    }
}

impl From<MediaError> for ApiError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::UnsupportedType(_) | MediaError::TooLarge(_) => {
                ApiError::Validation(err.to_string())
            }
            MediaError::Upstream(_) => ApiError::Upstream(err.to_string()),
        }
    }
}
