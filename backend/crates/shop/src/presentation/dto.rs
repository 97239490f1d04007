//! API DTOs (Data Transfer Objects)
//!
//! Prices leave the service as JSON numbers.

use chrono::{DateTime, Utc};
use kernel::hypermedia::Envelope;
use kernel::id::{OrderId, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::entity::{
    order::{Order, OrderView},
    product::Product,
};

// ============================================================================
// Products
// ============================================================================

/// JSON body for `POST /products`. Multipart carries the same fields.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductRequest {
    pub name: Option<String>,
    pub price: Option<Value>,
}

/// One `PATCH /products/{id}` operation
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchOperationDto {
    pub prop_name: String,
    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub product_id: ProductId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_image: Option<String>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub attributes: Map<String, Value>,
}

impl ProductDto {
    /// Fields shown in listings
    pub fn summary(product: &Product) -> Self {
        Self {
            product_id: product.product_id,
            name: product.name.clone(),
            price: product.price.amount(),
            product_image: product.image_path.clone(),
            attributes: Map::new(),
        }
    }

    /// Everything, including patched-in attributes
    pub fn detail(product: Product) -> Self {
        Self {
            product_id: product.product_id,
            name: product.name,
            price: product.price.amount(),
            product_image: product.image_path,
            attributes: product.attributes,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductListResponse {
    pub count: usize,
    pub products: Vec<Envelope<ProductDto>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedProductResponse {
    pub message: &'static str,
    pub created_product: Envelope<ProductDto>,
}

// ============================================================================
// Orders
// ============================================================================

/// JSON body for `POST /orders`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub product_id: String,
    pub quantity: Option<Value>,
}

/// Product as seen from an order; `null` fields once it is deleted
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderProductDto {
    pub product_id: ProductId,
    pub name: Option<String>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderViewDto {
    pub order_id: OrderId,
    pub product: OrderProductDto,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

impl From<OrderView> for OrderViewDto {
    fn from(view: OrderView) -> Self {
        Self {
            order_id: view.order_id,
            product: OrderProductDto {
                product_id: view.product_id,
                name: view.product_name,
                price: view.product_price.map(|p| p.amount()),
            },
            quantity: view.quantity.get(),
            created_at: view.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderListResponse {
    pub count: usize,
    pub orders: Vec<Envelope<OrderViewDto>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedOrderDto {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: i32,
}

impl From<&Order> for CreatedOrderDto {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.order_id,
            product_id: order.product_id,
            quantity: order.quantity.get(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedOrderResponse {
    pub message: &'static str,
    pub created_order: Envelope<CreatedOrderDto>,
}
