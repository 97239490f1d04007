//! Order Queries
//!
//! Views carry the product's name and price as they are now.

use std::sync::Arc;

use kernel::id::OrderId;

use crate::domain::entity::order::OrderView;
use crate::domain::repository::OrderRepository;
use crate::error::{ShopError, ShopResult};

/// Read-side order operations
pub struct OrderQueries<R>
where
    R: OrderRepository,
{
    order_repo: Arc<R>,
}

impl<R> OrderQueries<R>
where
    R: OrderRepository,
{
    pub fn new(order_repo: Arc<R>) -> Self {
        Self { order_repo }
    }

    pub async fn list(&self) -> ShopResult<Vec<OrderView>> {
        self.order_repo.list_orders().await
    }

    pub async fn get(&self, order_id: OrderId) -> ShopResult<OrderView> {
        self.order_repo
            .find_order(&order_id)
            .await?
            .ok_or(ShopError::OrderNotFound)
    }
}
