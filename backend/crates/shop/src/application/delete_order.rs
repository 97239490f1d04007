//! Delete Order Use Case

use std::sync::Arc;

use kernel::id::OrderId;

use crate::domain::repository::OrderRepository;
use crate::error::{ShopError, ShopResult};

/// Delete order use case
pub struct DeleteOrderUseCase<R>
where
    R: OrderRepository,
{
    order_repo: Arc<R>,
}

impl<R> DeleteOrderUseCase<R>
where
    R: OrderRepository,
{
    pub fn new(order_repo: Arc<R>) -> Self {
        Self { order_repo }
    }

    pub async fn execute(&self, order_id: OrderId) -> ShopResult<()> {
        if !self.order_repo.delete_order(&order_id).await? {
            return Err(ShopError::OrderNotFound);
        }

        tracing::info!(order_id = %order_id, "Order deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryShopRepository;

    #[tokio::test]
    async fn test_missing_order() {
        let err = DeleteOrderUseCase::new(Arc::new(InMemoryShopRepository::new()))
            .execute(OrderId::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::OrderNotFound));
    }
}
