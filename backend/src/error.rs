//! Mapping of handler failures onto HTTP responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use shared::{ErrorResponse, ValidationError};
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad or missing input: 400.
    #[error("{message}")]
    ValidationFailed {
        message: String,
        detail: Option<String>,
    },

    /// Unknown id: 404.
    #[error("Task not found")]
    NotFound,

    /// The store could not serve the request: 500.
    #[error("{message}: {source}")]
    StorageFailure {
        message: &'static str,
        source: StoreError,
    },
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::ValidationFailed {
            message: message.into(),
            detail: None,
        }
    }

    /// A body that did not deserialize, reported as a 400 with the
    /// extractor's explanation attached.
    pub fn rejected(message: impl Into<String>, rejection: JsonRejection) -> Self {
        ApiError::ValidationFailed {
            message: message.into(),
            detail: Some(rejection.body_text()),
        }
    }

    /// Wraps a store failure with the operation that hit it. A store-level
    /// `NotFound` stays a 404.
    pub fn storage(message: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| match source {
            StoreError::NotFound(_) => ApiError::NotFound,
            source => ApiError::StorageFailure { message, source },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::StorageFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> Self {
        ApiError::validation(error.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::ValidationFailed { message, detail } => ErrorResponse {
                message,
                error: detail,
            },
            ApiError::NotFound => ErrorResponse {
                message: "Task not found".to_string(),
                error: None,
            },
            // storage details stay in the log
            ApiError::StorageFailure { message, source } => {
                tracing::error!(error = %source, "{message}");
                ErrorResponse {
                    message: message.to_string(),
                    error: None,
                }
            }
        };
        (status, Json(body)).into_response()
    }
}
