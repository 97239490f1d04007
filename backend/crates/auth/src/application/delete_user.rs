//! Delete User Use Case

use std::sync::Arc;

use kernel::id::UserId;

use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

/// Delete user use case
pub struct DeleteUserUseCase<R>
where
    R: UserRepository,
{
    user_repo: Arc<R>,
}

impl<R> DeleteUserUseCase<R>
where
    R: UserRepository,
{
    pub fn new(user_repo: Arc<R>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, user_id: UserId) -> AuthResult<()> {
        if !self.user_repo.delete(&user_id).await? {
            return Err(AuthError::UserNotFound);
        }

        tracing::info!(user_id = %user_id, "User deleted");
        Ok(())
    }
}
