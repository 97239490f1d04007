//! Product Queries

use std::sync::Arc;

use kernel::id::ProductId;

use crate::domain::entity::product::Product;
use crate::domain::repository::ProductRepository;
use crate::error::{ShopError, ShopResult};

/// Read-side product operations
pub struct ProductQueries<R>
where
    R: ProductRepository,
{
    product_repo: Arc<R>,
}

impl<R> ProductQueries<R>
where
    R: ProductRepository,
{
    pub fn new(product_repo: Arc<R>) -> Self {
        Self { product_repo }
    }

    pub async fn list(&self) -> ShopResult<Vec<Product>> {
        self.product_repo.list_products().await
    }

    pub async fn get(&self, product_id: ProductId) -> ShopResult<Product> {
        self.product_repo
            .find_product(&product_id)
            .await?
            .ok_or(ShopError::NoValidEntry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryShopRepository;

    #[tokio::test]
    async fn test_unknown_id() {
        let queries = ProductQueries::new(Arc::new(InMemoryShopRepository::new()));
        let err = queries.get(ProductId::new()).await.unwrap_err();
        assert!(matches!(err, ShopError::NoValidEntry));
        assert!(queries.list().await.unwrap().is_empty());
    }
}
