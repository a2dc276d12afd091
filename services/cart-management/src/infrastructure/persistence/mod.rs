//! 进程内存储，数据随进程生命周期存在

mod memory_cart;
mod memory_catalog;

pub use memory_cart::InMemoryCartStore;
pub use memory_catalog::InMemoryCatalog;
