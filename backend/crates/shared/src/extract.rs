//! HTTP Extractors
//!
//! Thin wrappers over axum extractors whose rejections are rendered as
//! [`AppError`] bodies instead of axum's plain-text defaults.

use axum::extract::FromRequest;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::error::app_error::AppError;

/// `axum::Json` with a JSON error body on rejection
#[derive(Debug, Clone, Copy, Default, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}
