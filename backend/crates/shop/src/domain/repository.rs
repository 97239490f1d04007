//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::{OrderId, ProductId};

use crate::domain::entity::{
    order::{Order, OrderView},
    product::Product,
};
use crate::domain::value_object::{image::ImageUpload, product_patch::ProductPatch};
use crate::error::ShopResult;

/// Product repository trait
#[trait_variant::make(ProductRepository: Send)]
pub trait LocalProductRepository {
    async fn create_product(&self, product: &Product) -> ShopResult<()>;

    /// All products in insertion order
    async fn list_products(&self) -> ShopResult<Vec<Product>>;

    async fn find_product(&self, product_id: &ProductId) -> ShopResult<Option<Product>>;

    async fn product_exists(&self, product_id: &ProductId) -> ShopResult<bool>;

    /// Returns `false` when no product has this id
    async fn update_product(&self, product_id: &ProductId, patch: &ProductPatch) -> ShopResult<bool>;

    /// Remove and return the product, so the caller can clean up its image
    async fn delete_product(&self, product_id: &ProductId) -> ShopResult<Option<Product>>;
}

/// Order repository trait
///
/// Views join the product's current name and price at read time.
#[trait_variant::make(OrderRepository: Send)]
pub trait LocalOrderRepository {
    async fn create_order(&self, order: &Order) -> ShopResult<()>;

    /// All orders in insertion order
    async fn list_orders(&self) -> ShopResult<Vec<OrderView>>;

    async fn find_order(&self, order_id: &OrderId) -> ShopResult<Option<OrderView>>;

    /// Returns `false` when no order has this id
    async fn delete_order(&self, order_id: &OrderId) -> ShopResult<bool>;
}

/// Storage for product images
#[trait_variant::make(ImageStore: Send)]
pub trait LocalImageStore {
    /// Store the bytes and return the path recorded on the product
    async fn save(&self, upload: &ImageUpload) -> ShopResult<String>;

    /// Delete by recorded path. `Ok(false)` when it was already gone.
    async fn remove(&self, path: &str) -> ShopResult<bool>;
}
