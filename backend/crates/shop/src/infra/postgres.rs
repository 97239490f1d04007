//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::{OrderId, ProductId};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::domain::entity::{
    order::{Order, OrderView},
    product::Product,
};
use crate::domain::repository::{OrderRepository, ProductRepository};
use crate::domain::value_object::{price::Price, product_patch::ProductPatch, quantity::Quantity};
use crate::error::ShopResult;

/// PostgreSQL-backed product and order repository
#[derive(Clone)]
pub struct PgShopRepository {
    pool: PgPool,
}

impl PgShopRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Product Repository Implementation
// ============================================================================

impl ProductRepository for PgShopRepository {
    async fn create_product(&self, product: &Product) -> ShopResult<()> {
        sqlx::query(
            r#"
            INSERT INTO products (
                product_id,
                name,
                price,
                image_path,
                attributes,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(product.product_id.as_uuid())
        .bind(&product.name)
        .bind(product.price.amount())
        .bind(product.image_path.as_deref())
        .bind(Json(&product.attributes))
        .bind(product.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_products(&self) -> ShopResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT
                product_id,
                name,
                price,
                image_path,
                attributes,
                created_at
            FROM products
            ORDER BY created_at, product_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ProductRow::into_product).collect())
    }

    async fn find_product(&self, product_id: &ProductId) -> ShopResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT
                product_id,
                name,
                price,
                image_path,
                attributes,
                created_at
            FROM products
            WHERE product_id = $1
            "#,
        )
        .bind(product_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ProductRow::into_product))
    }

    async fn product_exists(&self, product_id: &ProductId) -> ShopResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE product_id = $1)")
                .bind(product_id.as_uuid())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn update_product(&self, product_id: &ProductId, patch: &ProductPatch) -> ShopResult<bool> {
        // Unknown fields are merged with jsonb `||`, so later keys replace
        // earlier ones and untouched keys survive.
        let updated = sqlx::query(
            r#"
            UPDATE products SET
                name = COALESCE($2, name),
                price = COALESCE($3, price),
                attributes = attributes || $4
            WHERE product_id = $1
            "#,
        )
        .bind(product_id.as_uuid())
        .bind(patch.name.as_deref())
        .bind(patch.price.map(|p| p.amount()))
        .bind(Json(&patch.attributes))
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(updated > 0)
    }

    async fn delete_product(&self, product_id: &ProductId) -> ShopResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            DELETE FROM products
            WHERE product_id = $1
            RETURNING
                product_id,
                name,
                price,
                image_path,
                attributes,
                created_at
            "#,
        )
        .bind(product_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ProductRow::into_product))
    }
}

// ============================================================================
// Order Repository Implementation
// ============================================================================

impl OrderRepository for PgShopRepository {
    async fn create_order(&self, order: &Order) -> ShopResult<()> {
        sqlx::query(
            r#"
            INSERT INTO orders (
                order_id,
                product_id,
                quantity,
                created_at
            ) VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(order.order_id.as_uuid())
        .bind(order.product_id.as_uuid())
        .bind(order.quantity.get())
        .bind(order.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_orders(&self) -> ShopResult<Vec<OrderView>> {
        let rows = sqlx::query_as::<_, OrderViewRow>(
            r#"
            SELECT
                o.order_id,
                o.product_id,
                o.quantity,
                o.created_at,
                p.name AS product_name,
                p.price AS product_price
            FROM orders o
            LEFT JOIN products p ON p.product_id = o.product_id
            ORDER BY o.created_at, o.order_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(OrderViewRow::into_view).collect())
    }

    async fn find_order(&self, order_id: &OrderId) -> ShopResult<Option<OrderView>> {
        let row = sqlx::query_as::<_, OrderViewRow>(
            r#"
            SELECT
                o.order_id,
                o.product_id,
                o.quantity,
                o.created_at,
                p.name AS product_name,
                p.price AS product_price
            FROM orders o
            LEFT JOIN products p ON p.product_id = o.product_id
            WHERE o.order_id = $1
            "#,
        )
        .bind(order_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(OrderViewRow::into_view))
    }

    async fn delete_order(&self, order_id: &OrderId) -> ShopResult<bool> {
        let deleted = sqlx::query("DELETE FROM orders WHERE order_id = $1")
            .bind(order_id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct ProductRow {
    product_id: Uuid,
    name: String,
    price: Decimal,
    image_path: Option<String>,
    attributes: Json<Map<String, Value>>,
    created_at: DateTime<Utc>,
}

impl ProductRow {
    fn into_product(self) -> Product {
        Product {
            product_id: ProductId::from_uuid(self.product_id),
            name: self.name,
            price: Price::from_db(self.price),
            image_path: self.image_path,
            attributes: self.attributes.0,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct OrderViewRow {
    order_id: Uuid,
    product_id: Uuid,
    quantity: i32,
    created_at: DateTime<Utc>,
    product_name: Option<String>,
    product_price: Option<Decimal>,
}

impl OrderViewRow {
    fn into_view(self) -> OrderView {
        OrderView {
            order_id: OrderId::from_uuid(self.order_id),
            product_id: ProductId::from_uuid(self.product_id),
            product_name: self.product_name,
            product_price: self.product_price.map(Price::from_db),
            quantity: Quantity::from_db(self.quantity),
            created_at: self.created_at,
        }
    }
}
