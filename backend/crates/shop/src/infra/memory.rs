//! In-Memory Repository
//!
//! Used by tests and when the API runs without a database. Order views
//! are joined against the product list on every read, like the SQL query.

use std::sync::Arc;

use kernel::id::{OrderId, ProductId};
use tokio::sync::RwLock;

use crate::domain::entity::{
    order::{Order, OrderView},
    product::Product,
};
use crate::domain::repository::{OrderRepository, ProductRepository};
use crate::domain::value_object::product_patch::ProductPatch;
use crate::error::ShopResult;

#[derive(Clone, Default)]
pub struct InMemoryShopRepository {
    products: Arc<RwLock<Vec<Product>>>,
    orders: Arc<RwLock<Vec<Order>>>,
}

impl InMemoryShopRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn order_count(&self) -> usize {
        self.orders.read().await.len()
    }

    fn view(order: &Order, products: &[Product]) -> OrderView {
        let product = products.iter().find(|p| p.product_id == order.product_id);
        OrderView {
            order_id: order.order_id,
            product_id: order.product_id,
            product_name: product.map(|p| p.name.clone()),
            product_price: product.map(|p| p.price),
            quantity: order.quantity,
            created_at: order.created_at,
        }
    }
}

impl ProductRepository for InMemoryShopRepository {
    async fn create_product(&self, product: &Product) -> ShopResult<()> {
        self.products.write().await.push(product.clone());
        Ok(())
    }

    async fn list_products(&self) -> ShopResult<Vec<Product>> {
        Ok(self.products.read().await.clone())
    }

    async fn find_product(&self, product_id: &ProductId) -> ShopResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.iter().find(|p| &p.product_id == product_id).cloned())
    }

    async fn product_exists(&self, product_id: &ProductId) -> ShopResult<bool> {
        let products = self.products.read().await;
        Ok(products.iter().any(|p| &p.product_id == product_id))
    }

    async fn update_product(&self, product_id: &ProductId, patch: &ProductPatch) -> ShopResult<bool> {
        let mut products = self.products.write().await;
        match products.iter_mut().find(|p| &p.product_id == product_id) {
            Some(product) => {
                patch.apply_to(product);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_product(&self, product_id: &ProductId) -> ShopResult<Option<Product>> {
        let mut products = self.products.write().await;
        let position = products.iter().position(|p| &p.product_id == product_id);
        Ok(position.map(|i| products.remove(i)))
    }
}

impl OrderRepository for InMemoryShopRepository {
    async fn create_order(&self, order: &Order) -> ShopResult<()> {
        self.orders.write().await.push(order.clone());
        Ok(())
    }

    async fn list_orders(&self) -> ShopResult<Vec<OrderView>> {
        let orders = self.orders.read().await;
        let products = self.products.read().await;
        Ok(orders.iter().map(|o| Self::view(o, &products)).collect())
    }

    async fn find_order(&self, order_id: &OrderId) -> ShopResult<Option<OrderView>> {
        let orders = self.orders.read().await;
        let products = self.products.read().await;
        Ok(orders
            .iter()
            .find(|o| &o.order_id == order_id)
            .map(|o| Self::view(o, &products)))
    }

    async fn delete_order(&self, order_id: &OrderId) -> ShopResult<bool> {
        let mut orders = self.orders.write().await;
        let before = orders.len();
        orders.retain(|o| &o.order_id != order_id);
        Ok(orders.len() < before)
    }
}
