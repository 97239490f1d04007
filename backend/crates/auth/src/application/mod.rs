//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod delete_user;
pub mod log_in;
pub mod sign_up;

// Re-exports
pub use config::AuthConfig;
pub use delete_user::DeleteUserUseCase;
pub use log_in::{LogInInput, LogInUseCase};
pub use sign_up::{SignUpInput, SignUpUseCase};

use std::sync::Arc;

use platform::password::{ClearTextPassword, CredentialHasher, HashedPassword};

use crate::error::{AuthError, AuthResult};

/// Hash off the async runtime; Argon2 is deliberately slow.
pub(crate) async fn hash_blocking(
    hasher: Arc<CredentialHasher>,
    password: ClearTextPassword,
) -> AuthResult<HashedPassword> {
    tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| AuthError::Internal(e.to_string()))?
        .map_err(|e| AuthError::Internal(e.to_string()))
}

/// Verify off the async runtime. `None` runs the dummy comparison.
pub(crate) async fn verify_blocking(
    hasher: Arc<CredentialHasher>,
    password: ClearTextPassword,
    hashed: Option<HashedPassword>,
) -> AuthResult<bool> {
    tokio::task::spawn_blocking(move || match hashed {
        Some(hashed) => hasher.verify(&password, &hashed),
        None => hasher.verify_dummy(&password),
    })
    .await
    .map_err(|e| AuthError::Internal(e.to_string()))
}
