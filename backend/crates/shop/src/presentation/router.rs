//! Products and Orders Routers

use auth::{AuthGate, require_auth};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, patch, post},
};

use crate::domain::repository::{ImageStore, OrderRepository, ProductRepository};
use crate::presentation::handlers::{self, ShopAppState};

/// Room for form fields next to the image
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Create the `/products` router
///
/// Creating always needs a token; with `strict_auth` so do patch and
/// delete. Reads are open.
pub fn products_router<R, I>(state: ShopAppState<R, I>, gate: AuthGate) -> Router
where
    R: ProductRepository + OrderRepository + Send + Sync + 'static,
    I: ImageStore + Send + Sync + 'static,
{
    let auth = from_fn_with_state(gate, require_auth);

    let collection = post(handlers::create_product::<R, I>)
        .route_layer(auth.clone())
        .get(handlers::list_products::<R, I>);

    let mut item = patch(handlers::update_product::<R, I>).delete(handlers::delete_product::<R, I>);
    if state.config.strict_auth {
        item = item.route_layer(auth);
    }
    let item = item.get(handlers::get_product::<R, I>);

    let body_limit = state.config.max_image_bytes + FORM_OVERHEAD_BYTES;

    Router::new()
        .route("/", collection)
        .route("/{product_id}", item)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Create the `/orders` router. Every route needs a token.
pub fn orders_router<R, I>(state: ShopAppState<R, I>, gate: AuthGate) -> Router
where
    R: ProductRepository + OrderRepository + Send + Sync + 'static,
    I: ImageStore + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/",
            get(handlers::list_orders::<R, I>).post(handlers::place_order::<R, I>),
        )
        .route(
            "/{order_id}",
            get(handlers::get_order::<R, I>).delete(handlers::delete_order::<R, I>),
        )
        .route_layer(from_fn_with_state(gate, require_auth))
        .with_state(state)
}
