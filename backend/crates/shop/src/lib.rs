//! Shop Backend Module
//!
//! Products, orders and product images.
//!
//! - `domain/` - Product and order entities, price/quantity/patch value
//!   objects, repository and image store traits
//! - `application/` - Use cases and `ShopConfig`
//! - `infra/` - PostgreSQL, in-memory and filesystem adapters
//! - `presentation/` - Handlers, DTOs, `/products` and `/orders` routers
//!
//! Orders only reference a product; every read joins the product's
//! current name and price. Deleting a product leaves its orders in place.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::ShopConfig;
pub use error::{ShopError, ShopResult};
pub use infra::{FsImageStore, InMemoryImageStore, InMemoryShopRepository, PgShopRepository};
pub use presentation::{ShopAppState, orders_router, products_router};
