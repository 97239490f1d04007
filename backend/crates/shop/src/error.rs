//! Shop Error Types
//!
//! Product and order failures, rendered through `kernel::error::AppError`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Shop-specific result type alias
pub type ShopResult<T> = Result<T, ShopError>;

#[derive(Debug, Error)]
pub enum ShopError {
    /// Missing or malformed field
    #[error("{0}")]
    Validation(String),

    /// `GET /products/{id}` on an id that resolves to nothing
    #[error("No valid entry found for provided ID")]
    NoValidEntry,

    #[error("Product not found")]
    ProductNotFound,

    #[error("Order not found")]
    OrderNotFound,

    /// Database error
    #[error("Database error: {0}")]
    Storage(#[from] sqlx::Error),

    /// Image file could not be written or removed
    #[error("Image storage error: {0}")]
    Image(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ShopError {
    pub fn validation(message: impl Into<String>) -> Self {
        ShopError::Validation(message.into())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ShopError::Validation(_) => StatusCode::BAD_REQUEST,
            ShopError::NoValidEntry | ShopError::ProductNotFound | ShopError::OrderNotFound => {
                StatusCode::NOT_FOUND
            }
            ShopError::Storage(_) | ShopError::Image(_) | ShopError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ShopError::Validation(_) => ErrorKind::Validation,
            ShopError::NoValidEntry | ShopError::ProductNotFound | ShopError::OrderNotFound => {
                ErrorKind::NotFound
            }
            ShopError::Storage(_) | ShopError::Image(_) => ErrorKind::Storage,
            ShopError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    fn log(&self) {
        match self {
            ShopError::Storage(e) => {
                tracing::error!(error = %e, "Shop database error");
            }
            ShopError::Image(e) => {
                tracing::error!(error = %e, "Image storage error");
            }
            ShopError::Internal(msg) => {
                tracing::error!(message = %msg, "Shop internal error");
            }
            _ => {
                tracing::debug!(error = %self, "Shop request rejected");
            }
        }
    }
}

impl IntoResponse for ShopError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for ShopError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::Validation => ShopError::Validation(err.message().to_string()),
            _ => ShopError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_messages() {
        assert_eq!(
            ShopError::NoValidEntry.to_app_error().message(),
            "No valid entry found for provided ID"
        );
        assert_eq!(ShopError::ProductNotFound.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_io_error_is_hidden() {
        let err = ShopError::from(std::io::Error::other("disk on fire"));
        let app = err.to_app_error();
        assert_eq!(app.status_code(), 500);
        assert_eq!(app.public_message(), "Internal server error");
    }
}
