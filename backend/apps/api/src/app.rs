//! Router Composition
//!
//! Nests the resource routers, serves stored images, and wraps everything
//! in the tracing, CORS and panic boundary layers.

use std::any::Any;
use std::path::Path;

use auth::domain::repository::UserRepository;
use auth::{AuthAppState, users_router};
use axum::{
    Router,
    http::{self, Method, header},
    response::{IntoResponse, Response},
};
use kernel::error::app_error::AppError;
use shop::domain::repository::{ImageStore, OrderRepository, ProductRepository};
use shop::{ShopAppState, orders_router, products_router};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Compose the full application for any storage backend
pub fn build_app<U, R, I>(
    auth_state: AuthAppState<U>,
    shop_state: ShopAppState<R, I>,
    upload_dir: &Path,
    frontend_origins: &[String],
) -> Router
where
    U: UserRepository + Send + Sync + 'static,
    R: ProductRepository + OrderRepository + Send + Sync + 'static,
    I: ImageStore + Send + Sync + 'static,
{
    let gate = auth_state.gate();

    let routes = Router::new()
        .nest("/users", users_router(auth_state))
        .nest("/products", products_router(shop_state.clone(), gate.clone()))
        .nest("/orders", orders_router(shop_state, gate))
        .nest_service("/uploads", ServeDir::new(upload_dir));

    with_boundary_layers(routes, cors_layer(frontend_origins))
}

/// Tracing, CORS, and a panic boundary that answers with the JSON 500 body
pub fn with_boundary_layers(router: Router, cors: CorsLayer) -> Router {
    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

fn panic_response(_panic: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!("Request handler panicked");
    AppError::internal("Handler panicked").into_response()
}

fn cors_layer(frontend_origins: &[String]) -> CorsLayer {
    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use auth::{AuthConfig, InMemoryUserRepository};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use serde_json::{Value, json};
    use shop::{InMemoryImageStore, InMemoryShopRepository, ShopConfig};
    use std::path::PathBuf;
    use tower::ServiceExt;

    fn test_app(upload_dir: &Path) -> Router {
        let auth_state =
            AuthAppState::new(InMemoryUserRepository::new(), AuthConfig::development()).unwrap();
        let shop_state = ShopAppState::new(
            InMemoryShopRepository::new(),
            InMemoryImageStore::new(),
            ShopConfig::development(),
        );
        build_app(auth_state, shop_state, upload_dir, &[])
    }

    async fn call(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("api-uploads-{}", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_signup_to_order() {
        let app = test_app(&temp_dir());
        let credentials = json!({ "email": "ann@example.com", "password": "correct horse" });

        let (status, _) = call(&app, "POST", "/users/signup", Some(credentials.clone()), None).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = call(&app, "POST", "/users/login", Some(credentials), None).await;
        assert_eq!(status, StatusCode::OK);
        let token = body["token"].as_str().unwrap().to_string();

        let (status, body) = call(
            &app,
            "POST",
            "/products",
            Some(json!({ "name": "Harry Potter", "price": 12.99 })),
            Some(&token),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let product_id = body["createdProduct"]["productId"].as_str().unwrap().to_string();
        assert_eq!(
            body["createdProduct"]["links"][0]["href"],
            format!("http://localhost:3000/products/{product_id}")
        );

        let (status, _) = call(
            &app,
            "POST",
            "/orders",
            Some(json!({ "productId": product_id, "quantity": 3 })),
            Some(&token),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = call(&app, "GET", "/orders", None, Some(&token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["orders"][0]["product"]["name"], "Harry Potter");
        assert_eq!(body["orders"][0]["quantity"], 3);
    }

    #[tokio::test]
    async fn test_forged_token_is_generic_401() {
        let app = test_app(&temp_dir());
        let (status, body) = call(&app, "GET", "/orders", None, Some("not.a.token")).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["message"], "Authentication failed");
    }

    #[tokio::test]
    async fn test_uploads_are_served() {
        let dir = temp_dir();
        tokio::fs::create_dir_all(&dir).await.unwrap();
        tokio::fs::write(dir.join("lamp.png"), b"png-bytes").await.unwrap();
        let app = test_app(&dir);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/uploads/lamp.png")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"png-bytes");

        let (status, _) = call(&app, "GET", "/uploads/missing.png", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_panic_becomes_json_500() {
        async fn boom() -> &'static str {
            panic!("boom")
        }

        let app = with_boundary_layers(
            Router::new().route("/boom", get(boom)),
            cors_layer(&[]),
        );
        let (status, body) = call(&app, "GET", "/boom", None, None).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({ "error": { "message": "Internal server error", "kind": "INTERNAL" } })
        );
    }
}
