//! Order Entity and Read View

use chrono::{DateTime, Utc};
use kernel::id::{OrderId, ProductId};

use crate::domain::value_object::{price::Price, quantity::Quantity};

/// Order as stored: only a reference to the product
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: Quantity,
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn new(product_id: ProductId, quantity: Quantity) -> Self {
        Self {
            order_id: OrderId::new(),
            product_id,
            quantity,
            created_at: Utc::now(),
        }
    }
}

/// Order joined with the product's current name and price at read time.
///
/// The product fields are `None` when the product has since been deleted.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderView {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub product_name: Option<String>,
    pub product_price: Option<Price>,
    pub quantity: Quantity,
    pub created_at: DateTime<Utc>,
}
