//! Quantity Value Object

use serde_json::Value;

use crate::error::{ShopError, ShopResult};

/// Ordered quantity, at least 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantity(i32);

impl Quantity {
    /// Used when the client omits `quantity`
    pub const DEFAULT: Quantity = Quantity(1);

    pub fn new(value: i64) -> ShopResult<Self> {
        if value < 1 {
            return Err(ShopError::validation("Quantity must be at least 1"));
        }
        i32::try_from(value)
            .map(Self)
            .map_err(|_| ShopError::validation("Quantity is too large"))
    }

    /// Missing or `null` means [`Quantity::DEFAULT`]. Whole numbers and
    /// numeric strings are accepted.
    pub fn from_json(value: Option<&Value>) -> ShopResult<Self> {
        match value {
            None | Some(Value::Null) => Ok(Self::DEFAULT),
            Some(Value::Number(n)) => {
                if let Some(i) = n.as_i64() {
                    return Self::new(i);
                }
                match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f >= 1.0 && f <= i32::MAX as f64 => {
                        Self::new(f as i64)
                    }
                    Some(f) if f < 1.0 => Err(ShopError::validation("Quantity must be at least 1")),
                    _ => Err(ShopError::validation("Quantity must be a whole number")),
                }
            }
            Some(Value::String(s)) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| ShopError::validation("Quantity must be a whole number"))
                .and_then(Self::new),
            Some(_) => Err(ShopError::validation("Quantity must be a whole number")),
        }
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(value: i32) -> Self {
        Self(value)
    }

    pub fn get(&self) -> i32 {
        self.0
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::DEFAULT
    }
}
