//! Application Layer
//!
//! Product and order use cases.

pub mod config;
pub mod create_product;
pub mod delete_order;
pub mod delete_product;
pub mod get_order;
pub mod get_product;
pub mod place_order;
pub mod update_product;

// Re-exports
pub use config::ShopConfig;
pub use create_product::{CreateProductInput, CreateProductUseCase};
pub use delete_order::DeleteOrderUseCase;
pub use delete_product::DeleteProductUseCase;
pub use get_order::OrderQueries;
pub use get_product::ProductQueries;
pub use place_order::{PlaceOrderInput, PlaceOrderUseCase};
pub use update_product::UpdateProductUseCase;
