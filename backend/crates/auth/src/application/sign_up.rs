//! Sign Up Use Case
//!
//! Creates a new user account.

use std::sync::Arc;

use kernel::id::UserId;
use platform::password::{ClearTextPassword, CredentialHasher};

use crate::application::hash_blocking;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// Sign up input
pub struct SignUpInput {
    pub email: String,
    pub password: String,
}

/// Sign up use case
pub struct SignUpUseCase<R>
where
    R: UserRepository,
{
    user_repo: Arc<R>,
    hasher: Arc<CredentialHasher>,
}

impl<R> SignUpUseCase<R>
where
    R: UserRepository,
{
    pub fn new(user_repo: Arc<R>, hasher: Arc<CredentialHasher>) -> Self {
        Self { user_repo, hasher }
    }

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<UserId> {
        let email = Email::new(input.email)?;

        let password = ClearTextPassword::new(input.password)
            .map_err(|e| AuthError::InvalidInput(e.to_string()))?;

        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = hash_blocking(self.hasher.clone(), password).await?;

        let user = User::new(email, password_hash);
        self.user_repo.create(&user).await?;

        tracing::info!(user_id = %user.user_id, "User signed up");

        Ok(user.user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::InMemoryUserRepository;
    use platform::password::HashCost;

    fn use_case(repo: &InMemoryUserRepository) -> SignUpUseCase<InMemoryUserRepository> {
        let hasher = CredentialHasher::new(HashCost::minimal(), None).unwrap();
        SignUpUseCase::new(Arc::new(repo.clone()), Arc::new(hasher))
    }

    fn input(email: &str, password: &str) -> SignUpInput {
        SignUpInput {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_sign_up_stores_hash_not_plaintext() {
        let repo = InMemoryUserRepository::new();
        let user_id = use_case(&repo)
            .execute(input("ann@example.com", "correct horse"))
            .await
            .unwrap();

        let stored = repo
            .find_by_email(&Email::new("ann@example.com").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.user_id, user_id);
        assert!(!stored.password_hash.as_phc_string().contains("correct horse"));
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let repo = InMemoryUserRepository::new();
        let uc = use_case(&repo);
        uc.execute(input("ann@example.com", "correct horse"))
            .await
            .unwrap();

        let err = uc
            .execute(input("ann@example.com", "another password"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_weak_password_rejected() {
        let repo = InMemoryUserRepository::new();
        let err = use_case(&repo)
            .execute(input("ann@example.com", "short"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidInput(_)));
        assert_eq!(repo.len().await, 0);
    }

    #[tokio::test]
    async fn test_bad_email_rejected() {
        let repo = InMemoryUserRepository::new();
        let err = use_case(&repo)
            .execute(input("not-an-email", "correct horse"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }
}
