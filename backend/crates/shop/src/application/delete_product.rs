//! Delete Product Use Case
//!
//! Removes the record, then its stored image. A failed image removal is
//! reported but the record stays deleted.

use std::sync::Arc;

use kernel::id::ProductId;

use crate::domain::repository::{ImageStore, ProductRepository};
use crate::error::{ShopError, ShopResult};

/// Delete product use case
pub struct DeleteProductUseCase<R, I>
where
    R: ProductRepository,
    I: ImageStore,
{
    product_repo: Arc<R>,
    images: Arc<I>,
}

impl<R, I> DeleteProductUseCase<R, I>
where
    R: ProductRepository,
    I: ImageStore,
{
    pub fn new(product_repo: Arc<R>, images: Arc<I>) -> Self {
        Self {
            product_repo,
            images,
        }
    }

    pub async fn execute(&self, product_id: ProductId) -> ShopResult<()> {
        let product = self
            .product_repo
            .delete_product(&product_id)
            .await?
            .ok_or(ShopError::ProductNotFound)?;

        tracing::info!(product_id = %product_id, "Product deleted");

        if let Some(path) = &product.image_path {
            if !self.images.remove(path).await? {
                tracing::debug!(path = %path, "Product image was already gone");
            }
        }

        Ok(())
    }
}
