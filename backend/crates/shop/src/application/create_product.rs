//! Create Product Use Case
//!
//! Validates the fields, stores the image if one came with the request,
//! then persists the product.

use std::sync::Arc;

use serde_json::Value;

use crate::application::config::ShopConfig;
use crate::domain::entity::product::{Product, validate_name};
use crate::domain::repository::{ImageStore, ProductRepository};
use crate::domain::value_object::{image::ImageUpload, price::Price};
use crate::error::{ShopError, ShopResult};

/// Create product input, as received from JSON or multipart
pub struct CreateProductInput {
    pub name: Option<String>,
    /// JSON number or numeric string
    pub price: Option<Value>,
    pub image: Option<ImageUpload>,
}

/// Create product use case
pub struct CreateProductUseCase<R, I>
where
    R: ProductRepository,
    I: ImageStore,
{
    product_repo: Arc<R>,
    images: Arc<I>,
    config: Arc<ShopConfig>,
}

impl<R, I> CreateProductUseCase<R, I>
where
    R: ProductRepository,
    I: ImageStore,
{
    pub fn new(product_repo: Arc<R>, images: Arc<I>, config: Arc<ShopConfig>) -> Self {
        Self {
            product_repo,
            images,
            config,
        }
    }

    pub async fn execute(&self, input: CreateProductInput) -> ShopResult<Product> {
        let name = input
            .name
            .ok_or_else(|| ShopError::validation("Name is required"))?;
        let name = validate_name(&name)?;

        let price = input
            .price
            .ok_or_else(|| ShopError::validation("Price is required"))?;
        let price = Price::from_json(&price)?;

        if let Some(image) = &input.image {
            self.config.check_image(image)?;
        }

        let image_path = match &input.image {
            Some(image) => Some(self.images.save(image).await?),
            None => None,
        };

        let product = Product::new(name, price, image_path);

        if let Err(e) = self.product_repo.create_product(&product).await {
            if let Some(path) = &product.image_path {
                if let Err(cleanup) = self.images.remove(path).await {
                    tracing::warn!(path = %path, error = %cleanup, "Orphaned image left behind");
                }
            }
            return Err(e);
        }

        tracing::info!(
            product_id = %product.product_id,
            has_image = product.image_path.is_some(),
            "Product created"
        );

        Ok(product)
    }
}
