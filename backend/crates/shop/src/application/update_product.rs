//! Update Product Use Case

use std::sync::Arc;

use kernel::id::ProductId;
use serde_json::Value;

use crate::domain::repository::ProductRepository;
use crate::domain::value_object::product_patch::ProductPatch;
use crate::error::{ShopError, ShopResult};

/// Update product use case
pub struct UpdateProductUseCase<R>
where
    R: ProductRepository,
{
    product_repo: Arc<R>,
}

impl<R> UpdateProductUseCase<R>
where
    R: ProductRepository,
{
    pub fn new(product_repo: Arc<R>) -> Self {
        Self { product_repo }
    }

    /// Apply `(field, value)` operations in order
    pub async fn execute(
        &self,
        product_id: ProductId,
        operations: Vec<(String, Value)>,
    ) -> ShopResult<()> {
        let patch = ProductPatch::from_operations(operations)?;

        if !self.product_repo.update_product(&product_id, &patch).await? {
            return Err(ShopError::ProductNotFound);
        }

        tracing::info!(
            product_id = %product_id,
            extra_fields = patch.attributes.len(),
            "Product updated"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::product::Product;
    use crate::domain::value_object::price::Price;
    use crate::infra::InMemoryShopRepository;
    use rust_decimal_macros::dec;
    use serde_json::json;

    async fn seeded() -> (InMemoryShopRepository, ProductId) {
        let repo = InMemoryShopRepository::new();
        let product = Product::new("Lamp".to_string(), Price::parse("10").unwrap(), None);
        repo.create_product(&product).await.unwrap();
        (repo, product.product_id)
    }

    fn op(field: &str, value: Value) -> (String, Value) {
        (field.to_string(), value)
    }

    #[tokio::test]
    async fn test_patch_known_and_unknown_fields() {
        let (repo, id) = seeded().await;
        let uc = UpdateProductUseCase::new(Arc::new(repo.clone()));

        uc.execute(
            id,
            vec![
                op("name", json!("Desk lamp")),
                op("price", json!(15)),
                op("colour", json!("green")),
            ],
        )
        .await
        .unwrap();

        let product = repo.find_product(&id).await.unwrap().unwrap();
        assert_eq!(product.name, "Desk lamp");
        assert_eq!(product.price.amount(), dec!(15));
        assert_eq!(product.attributes["colour"], "green");
    }

    #[tokio::test]
    async fn test_missing_product() {
        let (repo, _) = seeded().await;
        let err = UpdateProductUseCase::new(Arc::new(repo))
            .execute(ProductId::new(), vec![op("name", json!("x"))])
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::ProductNotFound));
    }

    #[tokio::test]
    async fn test_invalid_operation_changes_nothing() {
        let (repo, id) = seeded().await;
        let err = UpdateProductUseCase::new(Arc::new(repo.clone()))
            .execute(id, vec![op("name", json!("ok")), op("price", json!(-3))])
            .await
            .unwrap_err();

        assert!(matches!(err, ShopError::Validation(_)));
        assert_eq!(repo.find_product(&id).await.unwrap().unwrap().name, "Lamp");
    }
}
