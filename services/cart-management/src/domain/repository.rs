//! 存储接口

use async_trait::async_trait;

use super::item::{Item, ReportSummary};
use crate::error::CartError;

/// 商品目录存储
///
/// 读操作可以并发；插入和删除与同一存储上的所有读写互斥。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// 根据 ID 查找商品，不存在时返回 `ItemNotFound`
    async fn find_by_id(&self, id: &str) -> Result<Item, CartError>;

    /// 追加商品
    async fn insert(&self, item: Item) -> Result<(), CartError>;

    /// 删除第一个匹配的商品，保持其余商品的相对顺序
    async fn delete(&self, id: &str) -> Result<ReportSummary, CartError>;

    /// 当前目录的一致性副本
    async fn snapshot(&self) -> Result<Vec<Item>, CartError>;

    /// 当前商品数量
    async fn count(&self) -> usize;
}

/// 用户购物车存储（只读）
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// 查询用户购物车，不存在时返回 `UserNotFound`
    async fn find_by_user(&self, user: &str) -> Result<Vec<Item>, CartError>;
}
