//! Product Entity

use chrono::{DateTime, Utc};
use kernel::id::ProductId;
use serde_json::{Map, Value};

use crate::domain::value_object::price::Price;
use crate::error::{ShopError, ShopResult};

/// Product entity
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub product_id: ProductId,
    pub name: String,
    pub price: Price,
    /// Path under the upload directory, e.g. `uploads/2024-...-lamp.png`
    pub image_path: Option<String>,
    /// Fields merged in by patches without a schema
    pub attributes: Map<String, Value>,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Create a new product with a generated id
    pub fn new(name: String, price: Price, image_path: Option<String>) -> Self {
        Self {
            product_id: ProductId::new(),
            name,
            price,
            image_path,
            attributes: Map::new(),
            created_at: Utc::now(),
        }
    }
}

/// Trimmed, non-empty product name
pub fn validate_name(raw: &str) -> ShopResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ShopError::validation("Name cannot be empty"));
    }
    Ok(name.to_string())
}
