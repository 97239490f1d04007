//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{
    order::{Order, OrderView},
    product::Product,
};
pub use repository::{ImageStore, OrderRepository, ProductRepository};
pub use value_object::{
    image::ImageUpload, price::Price, product_patch::ProductPatch, quantity::Quantity,
};
