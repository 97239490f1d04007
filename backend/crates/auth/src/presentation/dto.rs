//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use serde::{Deserialize, Serialize};

// ============================================================================
// Sign Up
// ============================================================================

/// Sign up request
#[derive(Debug, Clone, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
}

/// Sign up response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpResponse {
    pub message: &'static str,
    pub user_id: UserId,
}

// ============================================================================
// Log In
// ============================================================================

/// Log in request
#[derive(Debug, Clone, Deserialize)]
pub struct LogInRequest {
    pub email: String,
    pub password: String,
}

/// Log in response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogInResponse {
    pub message: &'static str,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}
