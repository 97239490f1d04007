//! Auth Middleware
//!
//! Gate for protected routes. Reads a bearer token, verifies it, and puts
//! the [`AuthenticatedUser`] into the request extensions. Every rejection
//! answers 401 with the same body.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::{HeaderMap, header, request::Parts};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use kernel::id::UserId;
use platform::token::{TokenError, TokenService};

use crate::error::{AuthError, AuthResult};

/// Largest JSON body read while looking for a legacy `token` field
const MAX_TOKEN_BODY_BYTES: usize = 64 * 1024;

/// Middleware state
#[derive(Debug, Clone)]
pub struct AuthGate {
    tokens: Arc<TokenService>,
    accept_body_token: bool,
}

impl AuthGate {
    pub fn new(tokens: Arc<TokenService>, accept_body_token: bool) -> Self {
        Self {
            tokens,
            accept_body_token,
        }
    }

    /// Verify the request's token and attach the identity.
    ///
    /// The request is handed back because the legacy body path has to
    /// buffer and rebuild it.
    pub async fn authenticate(&self, req: Request) -> AuthResult<Request> {
        let (token, mut req) = match bearer_token(req.headers()) {
            Some(token) => (token, req),
            None if self.accept_body_token => body_token(req).await?,
            None => return Err(AuthError::MissingToken),
        };

        let claims = self.tokens.verify(&token)?;
        let user_id = UserId::parse(&claims.user_id).ok_or(AuthError::Token(TokenError::Invalid))?;

        req.extensions_mut().insert(AuthenticatedUser {
            user_id,
            email: claims.email,
        });

        Ok(req)
    }
}

/// Identity attached by [`require_auth`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub email: String,
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AuthError::MissingToken)
    }
}

/// Middleware that requires a valid bearer token
///
/// Use with `axum::middleware::from_fn_with_state(gate, require_auth)`.
pub async fn require_auth(State(gate): State<AuthGate>, req: Request, next: Next) -> Response {
    match gate.authenticate(req).await {
        Ok(req) => next.run(req).await,
        Err(e) => e.into_response(),
    }
}

/// `Authorization: Bearer <token>`, scheme matched case-insensitively
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

/// Legacy: `{"token": "..."}` in a JSON body. Buffers the body and puts it
/// back so the handler can still read it.
async fn body_token(req: Request) -> AuthResult<(String, Request)> {
    let is_json = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"));
    if !is_json {
        return Err(AuthError::MissingToken);
    }

    let (parts, body) = req.into_parts();
    let bytes = axum::body::to_bytes(body, MAX_TOKEN_BODY_BYTES)
        .await
        .map_err(|_| AuthError::MissingToken)?;

    let token = serde_json::from_slice::<serde_json::Value>(&bytes)
        .ok()
        .and_then(|v| v.get("token")?.as_str().map(str::to_string))
        .ok_or(AuthError::MissingToken)?;

    tracing::warn!(
        path = %parts.uri.path(),
        "Token read from request body; send an Authorization: Bearer header instead"
    );

    Ok((token, Request::from_parts(parts, Body::from(bytes))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::http::StatusCode;
    use axum::middleware::from_fn_with_state;
    use axum::routing::{get, post};
    use chrono::{Duration, Utc};
    use tower::ServiceExt;

    fn tokens() -> Arc<TokenService> {
        Arc::new(TokenService::new(b"gate-secret", Duration::hours(1)).unwrap())
    }

    async fn whoami(user: AuthenticatedUser) -> String {
        user.email
    }

    async fn echo(body: String) -> String {
        body
    }

    fn app(gate: AuthGate) -> Router {
        Router::new()
            .route("/me", get(whoami))
            .route("/echo", post(echo))
            .route_layer(from_fn_with_state(gate, require_auth))
    }

    async fn send(app: Router, req: Request) -> (StatusCode, String) {
        let response = app.oneshot(req).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    fn get_me(auth: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder().uri("/me");
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_valid_bearer_token() {
        let tokens = tokens();
        let user_id = UserId::new().to_string();
        let issued = tokens.issue(&user_id, "ann@example.com").unwrap();
        let app = app(AuthGate::new(tokens, false));

        let (status, body) = send(app, get_me(Some(&format!("Bearer {}", issued.token)))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ann@example.com");
    }

    #[tokio::test]
    async fn test_rejections_are_indistinguishable() {
        let tokens = tokens();
        let user_id = UserId::new().to_string();
        let expired = tokens
            .issue_at(&user_id, "ann@example.com", Utc::now() - Duration::hours(2))
            .unwrap();
        let app = app(AuthGate::new(tokens, false));

        let (s1, missing) = send(app.clone(), get_me(None)).await;
        let (s2, malformed) = send(app.clone(), get_me(Some("Bearer not.a.jwt"))).await;
        let (s3, stale) = send(app, get_me(Some(&format!("Bearer {}", expired.token)))).await;

        assert_eq!(s1, StatusCode::UNAUTHORIZED);
        assert_eq!(s2, StatusCode::UNAUTHORIZED);
        assert_eq!(s3, StatusCode::UNAUTHORIZED);
        assert_eq!(missing, malformed);
        assert_eq!(missing, stale);
        assert!(missing.contains("Authentication failed"));
    }

    #[tokio::test]
    async fn test_body_token_ignored_unless_enabled() {
        let tokens = tokens();
        let issued = tokens
            .issue(&UserId::new().to_string(), "ann@example.com")
            .unwrap();
        let payload = format!(r#"{{"token":"{}","quantity":2}}"#, issued.token);

        let request = || {
            axum::http::Request::builder()
                .method("POST")
                .uri("/echo")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.clone()))
                .unwrap()
        };

        let (status, _) = send(app(AuthGate::new(tokens.clone(), false)), request()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = send(app(AuthGate::new(tokens, true)), request()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, payload);
    }

    #[test]
    fn test_bearer_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, "bearer abc".parse().unwrap());
        assert_eq!(bearer_token(&headers).as_deref(), Some("abc"));

        headers.insert(header::AUTHORIZATION, "Basic abc".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, "Bearer ".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);
    }
}
