//! Users Router

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, post},
};

use crate::domain::repository::UserRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::require_auth;

/// Create the `/users` router for any repository implementation
///
/// With `strict_auth`, deleting a user needs a bearer token.
pub fn users_router<R>(state: AuthAppState<R>) -> Router
where
    R: UserRepository + Send + Sync + 'static,
{
    let mut delete_route = delete(handlers::delete_user::<R>);
    if state.config.strict_auth {
        delete_route = delete_route.route_layer(from_fn_with_state(state.gate(), require_auth));
    }

    Router::new()
        .route("/signup", post(handlers::sign_up::<R>))
        .route("/login", post(handlers::log_in::<R>))
        .route("/{user_id}", delete_route)
        .with_state(state)
}
