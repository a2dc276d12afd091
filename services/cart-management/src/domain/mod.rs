//! 领域模型

pub mod item;
pub mod repository;

pub use item::{Item, ReportSummary, User, UNKNOWN_USER_MARKER};
pub use repository::{CartRepository, CatalogRepository};
