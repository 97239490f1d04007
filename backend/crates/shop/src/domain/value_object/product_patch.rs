//! Product Patch
//!
//! Built from the `[{propName, value}, ...]` list a client sends to
//! `PATCH /products/{id}`. Known fields are validated; anything else is
//! merged into the product's free-form attributes unchecked.

use serde_json::{Map, Value};

use crate::domain::entity::product::{Product, validate_name};
use crate::domain::value_object::price::Price;
use crate::error::{ShopError, ShopResult};

/// Fields a patch may not touch. The image only changes through upload.
const READ_ONLY_FIELDS: &[&str] = &["_id", "id", "productId", "productImage", "createdAt"];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<Price>,
    pub attributes: Map<String, Value>,
}

impl ProductPatch {
    /// Later operations on the same field win.
    pub fn from_operations<I>(operations: I) -> ShopResult<Self>
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let mut patch = Self::default();

        for (field, value) in operations {
            match field.as_str() {
                "name" => {
                    let name = value
                        .as_str()
                        .ok_or_else(|| ShopError::validation("Name must be a string"))?;
                    patch.name = Some(validate_name(name)?);
                }
                "price" => patch.price = Some(Price::from_json(&value)?),
                f if READ_ONLY_FIELDS.contains(&f) => {
                    return Err(ShopError::validation(format!("Field '{f}' cannot be updated")));
                }
                "" => return Err(ShopError::validation("propName must not be empty")),
                _ => {
                    patch.attributes.insert(field, value);
                }
            }
        }

        Ok(patch)
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none() && self.attributes.is_empty()
    }

    /// Apply in place; used by stores that hold whole records.
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        for (key, value) in &self.attributes {
            product.attributes.insert(key.clone(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn ops(list: &[(&str, Value)]) -> Vec<(String, Value)> {
        list.iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_known_and_unknown_fields() {
        let patch = ProductPatch::from_operations(ops(&[
            ("name", json!("Desk Lamp")),
            ("price", json!(19.5)),
            ("color", json!("red")),
        ]))
        .unwrap();

        assert_eq!(patch.name.as_deref(), Some("Desk Lamp"));
        assert_eq!(patch.price.unwrap().amount(), dec!(19.5));
        assert_eq!(patch.attributes["color"], "red");
    }

    #[test]
    fn test_last_operation_wins() {
        let patch = ProductPatch::from_operations(ops(&[
            ("price", json!(1)),
            ("price", json!(2)),
        ]))
        .unwrap();
        assert_eq!(patch.price.unwrap().amount(), dec!(2));
    }

    #[test]
    fn test_invalid_known_fields() {
        assert!(ProductPatch::from_operations(ops(&[("price", json!(-1))])).is_err());
        assert!(ProductPatch::from_operations(ops(&[("name", json!(42))])).is_err());
        assert!(ProductPatch::from_operations(ops(&[("name", json!("  "))])).is_err());
    }

    #[test]
    fn test_read_only_fields() {
        for field in READ_ONLY_FIELDS {
            let result = ProductPatch::from_operations(ops(&[(*field, json!("x"))]));
            assert!(matches!(result, Err(ShopError::Validation(_))), "{field}");
        }
    }

    #[test]
    fn test_apply_to() {
        let mut product = Product::new("Lamp".into(), Price::parse("10").unwrap(), None);
        let patch = ProductPatch::from_operations(ops(&[
            ("price", json!("12")),
            ("stock", json!(3)),
        ]))
        .unwrap();

        patch.apply_to(&mut product);
        assert_eq!(product.name, "Lamp");
        assert_eq!(product.price.amount(), dec!(12));
        assert_eq!(product.attributes["stock"], 3);
    }

    #[test]
    fn test_empty_patch() {
        assert!(ProductPatch::from_operations(Vec::new()).unwrap().is_empty());
    }
}
