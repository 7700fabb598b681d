//! API errors with structured `{error, code}` bodies.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::openclaw::ConfigStoreError;
use crate::settings::SettingsError;
use crate::workspace::WorkspaceError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// The message without the category prefix, as shown to the UI.
    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(msg) | Self::Forbidden(msg) | Self::Internal(msg) => msg,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        match &self {
            ApiError::Internal(msg) => {
                error!(error_code = code, message = %msg, "API error");
            }
            ApiError::Forbidden(msg) => {
                warn!(error_code = code, message = %msg, "Forbidden request");
            }
            ApiError::BadRequest(msg) => {
                debug!(error_code = code, message = %msg, "Client error");
            }
        }

        let body = ErrorResponse {
            error: self.message().to_string(),
            code,
        };

        (status, Json(body)).into_response()
    }
}

impl From<WorkspaceError> for ApiError {
    fn from(err: WorkspaceError) -> Self {
        match err {
            WorkspaceError::InvalidName(_) => ApiError::bad_request("Invalid file name"),
            WorkspaceError::PathTraversal => ApiError::forbidden(err.to_string()),
            other => ApiError::internal(other.to_string()),
        }
    }
}

impl From<ConfigStoreError> for ApiError {
    fn from(err: ConfigStoreError) -> Self {
        ApiError::internal(err.to_string())
    }
}

impl From<SettingsError> for ApiError {
    fn from(err: SettingsError) -> Self {
        ApiError::internal(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::bad_request(format!("Invalid JSON body: {err}"))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
