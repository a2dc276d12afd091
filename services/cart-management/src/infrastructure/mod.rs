//! 基础设施层

pub mod health;
pub mod persistence;
pub mod seed;

pub use health::CatalogHealth;
pub use persistence::{InMemoryCartStore, InMemoryCatalog};
