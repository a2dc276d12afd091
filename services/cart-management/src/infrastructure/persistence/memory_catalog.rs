//! 内存商品目录

use async_trait::async_trait;
use cart_bootstrap::metrics::set_collection_size;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::{CatalogRepository, Item, ReportSummary};
use crate::error::CartError;

/// 基于写优先读写锁的商品目录
///
/// `tokio::sync::RwLock` 按 FIFO 排队，等待中的写者会阻止后来的读者插队。
pub struct InMemoryCatalog {
    items: RwLock<Vec<Item>>,
    unique_ids: bool,
}

impl InMemoryCatalog {
    /// `unique_ids` 为 true 时重复 ID 的插入返回 `DuplicateItem`
    pub fn new(unique_ids: bool) -> Self {
        Self {
            items: RwLock::new(Vec::new()),
            unique_ids,
        }
    }
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new(true)
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalog {
    async fn find_by_id(&self, id: &str) -> Result<Item, CartError> {
        let items = self.items.read().await;
        items
            .iter()
            .find(|item| item.id == id)
            .cloned()
            .ok_or_else(|| CartError::ItemNotFound(id.to_string()))
    }

    async fn insert(&self, item: Item) -> Result<(), CartError> {
        let mut items = self.items.write().await;
        if self.unique_ids && items.iter().any(|existing| existing.id == item.id) {
            return Err(CartError::DuplicateItem(item.id));
        }

        debug!(item_id = %item.id, "Inserting item");
        items.push(item);
        set_collection_size("catalog", items.len());
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<ReportSummary, CartError> {
        let mut items = self.items.write().await;
        if items.is_empty() {
            return Err(CartError::EmptyCatalog);
        }

        let index = items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| CartError::ItemNotFound(id.to_string()))?;
        items.remove(index);
        set_collection_size("catalog", items.len());

        Ok(ReportSummary::removed(id, items.len()))
    }

    async fn snapshot(&self) -> Result<Vec<Item>, CartError> {
        Ok(self.items.read().await.clone())
    }

    async fn count(&self) -> usize {
        self.items.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio_test::{assert_err, assert_ok};

    use super::*;

    async fn seeded() -> InMemoryCatalog {
        let catalog = InMemoryCatalog::default();
        catalog.insert(Item::new("1", "Mouse")).await.unwrap();
        catalog.insert(Item::new("2", "Keyboard")).await.unwrap();
        catalog.insert(Item::new("3", "Monitor")).await.unwrap();
        catalog
    }

    #[tokio::test]
    async fn test_find_absent_id_is_not_found() {
        let catalog = seeded().await;
        assert_eq!(catalog.find_by_id("2").await.unwrap().name, "Keyboard");
        assert!(matches!(
            catalog.find_by_id("9").await,
            Err(CartError::ItemNotFound(id)) if id == "9"
        ));
        assert!(matches!(
            catalog.find_by_id("").await,
            Err(CartError::ItemNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_duplicate_insert_is_rejected() {
        let catalog = seeded().await;
        let result = catalog.insert(Item::new("1", "Other mouse")).await;
        assert!(matches!(result, Err(CartError::DuplicateItem(id)) if id == "1"));
        assert_eq!(catalog.count().await, 3);
        assert_eq!(catalog.find_by_id("1").await.unwrap().name, "Mouse");
    }

    #[tokio::test]
    async fn test_permissive_catalog_keeps_duplicates() {
        let catalog = InMemoryCatalog::new(false);
        assert_ok!(catalog.insert(Item::new("1", "Mouse")).await);
        assert_ok!(catalog.insert(Item::new("1", "Mouse v2")).await);
        assert_eq!(catalog.count().await, 2);

        // 只删除第一个匹配项
        assert_ok!(catalog.delete("1").await);
        assert_eq!(catalog.find_by_id("1").await.unwrap().name, "Mouse v2");
    }

    #[tokio::test]
    async fn test_delete_preserves_order() {
        let catalog = seeded().await;
        let summary = catalog.delete("2").await.unwrap();
        assert_eq!(summary.id, "2");
        assert_eq!(
            summary.message,
            "Item Id: 2 successfully removed. Current items: 2"
        );

        let ids: Vec<_> = catalog
            .snapshot()
            .await
            .unwrap()
            .into_iter()
            .map(|item| item.id)
            .collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert!(matches!(
            catalog.find_by_id("2").await,
            Err(CartError::ItemNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_on_empty_catalog() {
        let catalog = InMemoryCatalog::default();
        assert!(matches!(
            catalog.delete("1").await,
            Err(CartError::EmptyCatalog)
        ));

        let catalog = seeded().await;
        assert_err!(catalog.delete("42").await);
        assert_eq!(catalog.count().await, 3);
    }

    #[tokio::test]
    async fn test_snapshot_is_detached_from_later_writes() {
        let catalog = seeded().await;
        let snapshot = catalog.snapshot().await.unwrap();

        catalog.delete("1").await.unwrap();
        catalog.insert(Item::new("4", "Hub")).await.unwrap();

        let ids: Vec<_> = snapshot.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_inserts_are_not_lost() {
        let catalog = Arc::new(seeded().await);

        let mut handles = Vec::new();
        for writer in 0..2 {
            let catalog = catalog.clone();
            handles.push(tokio::spawn(async move {
                for n in 0..100 {
                    catalog
                        .insert(Item::new(format!("w{}-{}", writer, n), "Cable"))
                        .await
                        .unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(catalog.count().await, 3 + 200);
    }
}
