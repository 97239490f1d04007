//! Price Value Object

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

use crate::error::{ShopError, ShopResult};

/// Non-negative product price
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(Decimal);

impl Price {
    pub fn new(amount: Decimal) -> ShopResult<Self> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(ShopError::validation("Price must not be negative"));
        }
        Ok(Self(amount.normalize()))
    }

    /// Parse decimal text such as `"12.99"` or `"1e3"`
    pub fn parse(raw: &str) -> ShopResult<Self> {
        let raw = raw.trim();
        let amount = Decimal::from_str(raw)
            .or_else(|_| Decimal::from_scientific(raw))
            .map_err(|_| ShopError::validation("Price must be a number"))?;
        Self::new(amount)
    }

    /// Accept a JSON number or a numeric string
    pub fn from_json(value: &Value) -> ShopResult<Self> {
        match value {
            Value::Number(n) => Self::parse(&n.to_string()),
            Value::String(s) => Self::parse(s),
            _ => Err(ShopError::validation("Price must be a number")),
        }
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(amount: Decimal) -> Self {
        Self(amount)
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
