//! Value Object Module

pub mod image;
pub mod price;
pub mod product_patch;
pub mod quantity;
