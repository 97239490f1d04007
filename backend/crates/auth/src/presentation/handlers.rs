//! HTTP Handlers

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use kernel::extract::Json;
use kernel::hypermedia::{Envelope, Link, Message};
use kernel::id::UserId;
use platform::password::CredentialHasher;
use platform::token::TokenService;
use serde_json::json;

use crate::application::config::AuthConfig;
use crate::application::{
    DeleteUserUseCase, LogInInput, LogInUseCase, SignUpInput, SignUpUseCase,
};
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{LogInRequest, LogInResponse, SignUpRequest, SignUpResponse};
use crate::presentation::middleware::AuthGate;

/// Shared state for auth handlers
pub struct AuthAppState<R>
where
    R: UserRepository + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
    pub hasher: Arc<CredentialHasher>,
    pub tokens: Arc<TokenService>,
}

impl<R> Clone for AuthAppState<R>
where
    R: UserRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
            hasher: self.hasher.clone(),
            tokens: self.tokens.clone(),
        }
    }
}

impl<R> AuthAppState<R>
where
    R: UserRepository + Send + Sync + 'static,
{
    /// Build the hasher and token service once for the process.
    pub fn new(repo: R, config: AuthConfig) -> AuthResult<Self> {
        let hasher = CredentialHasher::new(config.hash_cost, config.password_pepper.clone())
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        let tokens = TokenService::new(&config.token_secret, config.token_ttl)?;

        Ok(Self {
            repo: Arc::new(repo),
            config: Arc::new(config),
            hasher: Arc::new(hasher),
            tokens: Arc::new(tokens),
        })
    }

    /// Gate sharing this state's token service
    pub fn gate(&self) -> AuthGate {
        AuthGate::new(self.tokens.clone(), self.config.accept_body_token)
    }
}

// ============================================================================
// Sign Up
// ============================================================================

/// POST /users/signup
pub async fn sign_up<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<SignUpRequest>,
) -> AuthResult<(StatusCode, Json<Envelope<SignUpResponse>>)>
where
    R: UserRepository + Send + Sync + 'static,
{
    let use_case = SignUpUseCase::new(state.repo.clone(), state.hasher.clone());

    let user_id = use_case
        .execute(SignUpInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    let body = Envelope::new(SignUpResponse {
        message: "User created successfully",
        user_id,
    })
    .link(
        Link::post("log_in", state.config.base_url.join(&["users", "login"]))
            .with_body(json!({ "email": "String", "password": "String" })),
    );

    Ok((StatusCode::CREATED, Json(body)))
}

// ============================================================================
// Log In
// ============================================================================

/// POST /users/login
pub async fn log_in<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<LogInRequest>,
) -> AuthResult<Json<LogInResponse>>
where
    R: UserRepository + Send + Sync + 'static,
{
    let use_case = LogInUseCase::new(
        state.repo.clone(),
        state.hasher.clone(),
        state.tokens.clone(),
    );

    let issued = use_case
        .execute(LogInInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(LogInResponse {
        message: "Auth successful",
        token: issued.token,
        expires_at: issued.expires_at,
    }))
}

// ============================================================================
// Delete User
// ============================================================================

/// DELETE /users/{user_id}
pub async fn delete_user<R>(
    State(state): State<AuthAppState<R>>,
    Path(user_id): Path<String>,
) -> AuthResult<Json<Envelope<Message>>>
where
    R: UserRepository + Send + Sync + 'static,
{
    // A malformed id cannot match any user
    let user_id = UserId::parse(&user_id).ok_or(AuthError::UserNotFound)?;

    DeleteUserUseCase::new(state.repo.clone())
        .execute(user_id)
        .await?;

    let body = Message::envelope("User deleted").link(
        Link::post("sign_up", state.config.base_url.join(&["users", "signup"]))
            .with_description("Create a new user")
            .with_body(json!({ "email": "String", "password": "String" })),
    );

    Ok(Json(body))
}
