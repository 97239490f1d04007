//! Place Order Use Case
//!
//! The product must exist when the order is written. The check and the
//! insert are separate statements, so a product deleted in between still
//! gets the order.

use std::sync::Arc;

use kernel::id::{ProductId, UserId};
use serde_json::Value;

use crate::domain::entity::order::Order;
use crate::domain::repository::{OrderRepository, ProductRepository};
use crate::domain::value_object::quantity::Quantity;
use crate::error::{ShopError, ShopResult};

/// Place order input
pub struct PlaceOrderInput {
    /// Raw id from the request; unparsable ids cannot name a product
    pub product_id: String,
    /// Omitted means one
    pub quantity: Option<Value>,
    /// Who asked, for the log line only
    pub placed_by: Option<UserId>,
}

/// Place order use case
pub struct PlaceOrderUseCase<R>
where
    R: ProductRepository + OrderRepository,
{
    repo: Arc<R>,
}

impl<R> PlaceOrderUseCase<R>
where
    R: ProductRepository + OrderRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, input: PlaceOrderInput) -> ShopResult<Order> {
        let quantity = Quantity::from_json(input.quantity.as_ref())?;

        let product_id =
            ProductId::parse(&input.product_id).ok_or(ShopError::ProductNotFound)?;

        if !self.repo.product_exists(&product_id).await? {
            return Err(ShopError::ProductNotFound);
        }

        let order = Order::new(product_id, quantity);
        self.repo.create_order(&order).await?;

        match input.placed_by {
            Some(user_id) => tracing::info!(
                order_id = %order.order_id,
                product_id = %product_id,
                user_id = %user_id,
                "Order placed"
            ),
            None => tracing::info!(
                order_id = %order.order_id,
                product_id = %product_id,
                "Order placed"
            ),
        }

        Ok(order)
    }
}
