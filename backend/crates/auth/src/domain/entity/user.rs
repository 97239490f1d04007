//! User Entity

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use platform::password::HashedPassword;

use crate::domain::value_object::email::Email;

/// User entity
///
/// Holds only the hashed credential; the clear text never reaches this type.
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    /// Unique across all users, matched exactly
    pub email: Email,
    pub password_hash: HashedPassword,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a generated id
    pub fn new(email: Email, password_hash: HashedPassword) -> Self {
        Self {
            user_id: UserId::new(),
            email,
            password_hash,
            created_at: Utc::now(),
        }
    }
}
