//! Infrastructure Layer
//!
//! Database implementations and image storage.

pub mod image_store;
pub mod memory;
pub mod postgres;

pub use image_store::{FsImageStore, InMemoryImageStore};
pub use memory::InMemoryShopRepository;
pub use postgres::PgShopRepository;
