//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::UserId;

use crate::domain::entity::user::User;
use crate::domain::value_object::email::Email;
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a new user.
    ///
    /// Fails with `AuthError::EmailTaken` when the email is already stored,
    /// even if a concurrent signup won the race after the caller's lookup.
    async fn create(&self, user: &User) -> AuthResult<()>;

    /// Find user by exact email match
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Delete by id. Returns `false` when nothing was deleted.
    async fn delete(&self, user_id: &UserId) -> AuthResult<bool>;
}
