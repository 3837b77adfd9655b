use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::types::ApiErrorResponse;

/// Application error codes following the pattern E{area}{sequence}
///
/// Ranges:
/// - E0xxx: Shared/infrastructure errors
/// - E1xxx: Report errors
/// - E2xxx: Admin authentication errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Shared (E0xxx)
    InternalError,
    ValidationError,
    Unauthorized,
    RateLimited,

    // Reports (E1xxx)
    InvalidImei,
    InvalidStatus,
    EmptyPatch,
    ReportNotFound,

    // Admin auth (E2xxx)
    InvalidCredentials,
    PasswordRequired,
    AdminNotConfigured,
}

impl ErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            // Shared
            Self::InternalError => "E0001",
            Self::ValidationError => "E0002",
            Self::Unauthorized => "E0004",
            Self::RateLimited => "E0006",

            // Reports
            Self::InvalidImei => "E1001",
            Self::InvalidStatus => "E1002",
            Self::EmptyPatch => "E1003",
            Self::ReportNotFound => "E1004",

            // Admin auth
            Self::InvalidCredentials => "E2001",
            Self::PasswordRequired => "E2002",
            Self::AdminNotConfigured => "E2003",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InternalError | Self::AdminNotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ValidationError
            | Self::InvalidImei
            | Self::InvalidStatus
            | Self::EmptyPatch
            | Self::PasswordRequired => StatusCode::BAD_REQUEST,
            Self::ReportNotFound => StatusCode::NOT_FOUND,
            Self::Unauthorized | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        }
    }

    /// Codes whose message must never reach the caller.
    fn is_opaque(&self) -> bool {
        matches!(self, Self::InternalError)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Known {
        code: ErrorCode,
        message: String,
    },

    #[error("validation error: {0}")]
    Validation(String),
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Known {
            code,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// The error code this error is reported under.
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Known { code, .. } => *code,
            AppError::Validation(_) => ErrorCode::ValidationError,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match &self {
            AppError::Known { code, message } if code.is_opaque() => {
                tracing::error!(error = %message, "internal server error");
                (
                    code.status_code(),
                    ApiErrorResponse::new(code.code(), "internal server error"),
                )
            }
            AppError::Known { code, message } => {
                (code.status_code(), ApiErrorResponse::new(code.code(), message))
            }
            AppError::Validation(msg) => {
                let code = ErrorCode::ValidationError;
                (code.status_code(), ApiErrorResponse::new(code.code(), msg))
            }
        };

        (status, Json(error_response)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
