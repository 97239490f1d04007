//! In-Memory Repository
//!
//! Used by tests and when the API runs without a database.

use std::collections::HashMap;
use std::sync::Arc;

use kernel::id::UserId;
use tokio::sync::RwLock;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        let mut users = self.users.write().await;

        // Same guarantee as the unique index in Postgres
        if users.values().any(|u| u.email == user.email) {
            return Err(AuthError::EmailTaken);
        }

        users.insert(user.user_id, user.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| &u.email == email).cloned())
    }

    async fn delete(&self, user_id: &UserId) -> AuthResult<bool> {
        Ok(self.users.write().await.remove(user_id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::password::{ClearTextPassword, CredentialHasher, HashCost};

    fn user(email: &str) -> User {
        let hash = CredentialHasher::new(HashCost::minimal(), None)
            .unwrap()
            .hash(&ClearTextPassword::for_verification("pw".to_string()))
            .unwrap();
        User::new(Email::new(email).unwrap(), hash)
    }

    #[tokio::test]
    async fn test_unique_email() {
        let repo = InMemoryUserRepository::new();
        repo.create(&user("ann@example.com")).await.unwrap();

        let err = repo.create(&user("ann@example.com")).await.unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_delete_reports_missing() {
        let repo = InMemoryUserRepository::new();
        let u = user("ann@example.com");
        repo.create(&u).await.unwrap();

        assert!(repo.delete(&u.user_id).await.unwrap());
        assert!(!repo.delete(&u.user_id).await.unwrap());
        assert!(repo.is_empty().await);
    }
}
