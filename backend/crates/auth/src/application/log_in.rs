//! Log In Use Case
//!
//! Verifies credentials and issues a bearer token.

use std::sync::Arc;

use platform::password::{ClearTextPassword, CredentialHasher};
use platform::token::{IssuedToken, TokenService};

use crate::application::verify_blocking;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// Log in input
pub struct LogInInput {
    pub email: String,
    pub password: String,
}

/// Log in use case
pub struct LogInUseCase<R>
where
    R: UserRepository,
{
    user_repo: Arc<R>,
    hasher: Arc<CredentialHasher>,
    tokens: Arc<TokenService>,
}

impl<R> LogInUseCase<R>
where
    R: UserRepository,
{
    pub fn new(user_repo: Arc<R>, hasher: Arc<CredentialHasher>, tokens: Arc<TokenService>) -> Self {
        Self {
            user_repo,
            hasher,
            tokens,
        }
    }

    /// Every failure path spends one hash verification and returns
    /// `AuthFailed`, so callers cannot tell an unknown email from a wrong
    /// password.
    pub async fn execute(&self, input: LogInInput) -> AuthResult<IssuedToken> {
        // No policy here: a password that could never be set just fails.
        let password = ClearTextPassword::for_verification(input.password);

        let user = match Email::new(input.email) {
            Ok(email) => self.user_repo.find_by_email(&email).await?,
            Err(_) => None,
        };

        let Some(user) = user else {
            verify_blocking(self.hasher.clone(), password, None).await?;
            return Err(AuthError::AuthFailed);
        };

        let valid =
            verify_blocking(self.hasher.clone(), password, Some(user.password_hash.clone())).await?;
        if !valid {
            return Err(AuthError::AuthFailed);
        }

        let issued = self
            .tokens
            .issue(&user.user_id.to_string(), user.email.as_str())?;

        tracing::info!(
            user_id = %user.user_id,
            expires_at = %issued.expires_at,
            "User logged in"
        );

        Ok(issued)
    }
}
