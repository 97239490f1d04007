//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - User entity, email value object, repository trait
//! - `application/` - Sign-up, log-in and delete-user use cases
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - HTTP handlers, DTOs, bearer-token middleware, router
//!
//! ## Features
//! - User signup/login with email + password
//! - Stateless HS256 bearer tokens (one hour by default)
//! - Route gate that attaches the authenticated user to the request
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, fresh salt per hash
//! - Login failures are indistinguishable (unknown email or wrong password)
//! - Token rejections never tell the client why

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::{memory::InMemoryUserRepository, postgres::PgUserRepository};
pub use presentation::handlers::AuthAppState;
pub use presentation::middleware::{AuthGate, AuthenticatedUser, require_auth};
pub use presentation::router::users_router;
