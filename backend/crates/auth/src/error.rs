//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::token::TokenError;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed signup input (email shape, password policy)
    #[error("{0}")]
    InvalidInput(String),

    /// Email already registered
    #[error("Email already exists")]
    EmailTaken,

    /// Unknown email or wrong password. Deliberately the same message.
    #[error("Auth failed")]
    AuthFailed,

    /// No token on a protected route
    #[error("Authentication failed")]
    MissingToken,

    /// Token present but rejected
    #[error("Authentication failed")]
    Token(TokenError),

    /// User not found
    #[error("User not found")]
    UserNotFound,

    /// Database error
    #[error("Database error: {0}")]
    Storage(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AuthError::EmailTaken => StatusCode::CONFLICT,
            AuthError::AuthFailed | AuthError::MissingToken | AuthError::Token(_) => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::Storage(_) | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidInput(_) => ErrorKind::Validation,
            AuthError::EmailTaken => ErrorKind::Conflict,
            AuthError::AuthFailed | AuthError::MissingToken | AuthError::Token(_) => {
                ErrorKind::Unauthorized
            }
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::Storage(_) => ErrorKind::Storage,
            AuthError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Storage(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::AuthFailed => {
                tracing::warn!("Failed login attempt");
            }
            AuthError::MissingToken => {
                tracing::debug!(reason = "missing", "Token rejected");
            }
            AuthError::Token(TokenError::Expired) => {
                tracing::debug!(reason = "expired", "Token rejected");
            }
            AuthError::Token(_) => {
                tracing::debug!(reason = "invalid", "Token rejected");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::Validation => AuthError::InvalidInput(err.message().to_string()),
            _ => AuthError::Internal(err.to_string()),
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid | TokenError::Expired => AuthError::Token(err),
            TokenError::MissingSecret | TokenError::Signing(_) => {
                AuthError::Internal(err.to_string())
            }
        }
    }
}
