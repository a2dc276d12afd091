//! 启动种子数据
//!
//! 商品文件为对象数组，购物车文件为 `用户名 -> 商品数组` 的对象。

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::domain::{CatalogRepository, Item};
use crate::error::CartError;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Failed to read seed file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse seed file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to seed catalog: {0}")]
    Catalog(#[from] CartError),
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, SeedError> {
    let display = path.display().to_string();
    let data = tokio::fs::read(path).await.map_err(|source| SeedError::Io {
        path: display.clone(),
        source,
    })?;

    serde_json::from_slice(&data).map_err(|source| SeedError::Parse {
        path: display,
        source,
    })
}

/// 读取商品列表
pub async fn load_items(path: impl AsRef<Path>) -> Result<Vec<Item>, SeedError> {
    read_json(path.as_ref()).await
}

/// 读取用户购物车
pub async fn load_carts(path: impl AsRef<Path>) -> Result<HashMap<String, Vec<Item>>, SeedError> {
    read_json(path.as_ref()).await
}

/// 通过存储的插入接口写入种子商品，校验规则与 Add 相同
pub async fn seed_catalog<C>(catalog: &C, items: Vec<Item>) -> Result<usize, SeedError>
where
    C: CatalogRepository + ?Sized,
{
    let total = items.len();
    for item in items {
        item.validate()?;
        catalog.insert(item).await?;
    }

    info!(items = total, "Catalog seeded");
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::InMemoryCatalog;

    fn temp_file(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "cart-seed-{}-{}",
            uuid::Uuid::new_v4(),
            name
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn test_load_and_seed_items() {
        let path = temp_file(
            "item.json",
            r#"[{"id":"1","name":"Mouse","category":"Peripherals"},{"id":"2","name":"Keyboard"}]"#,
        );

        let items = load_items(&path).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].category, "Peripherals");

        let catalog = InMemoryCatalog::default();
        assert_eq!(seed_catalog(&catalog, items).await.unwrap(), 2);
        assert_eq!(catalog.count().await, 2);

        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn test_duplicate_seed_ids_fail() {
        let catalog = InMemoryCatalog::default();
        let items = vec![Item::new("1", "Mouse"), Item::new("1", "Mouse again")];

        let result = seed_catalog(&catalog, items).await;
        assert!(matches!(
            result,
            Err(SeedError::Catalog(CartError::DuplicateItem(_)))
        ));
    }

    #[tokio::test]
    async fn test_load_carts() {
        let path = temp_file(
            "carts.json",
            r#"{"myra":[{"id":"2","name":"Keyboard"}],"hadziq":[]}"#,
        );

        let carts = load_carts(&path).await.unwrap();
        assert_eq!(carts["myra"][0].name, "Keyboard");
        assert!(carts["hadziq"].is_empty());

        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn test_missing_and_malformed_files() {
        let missing = load_items("/definitely/not/here.json").await;
        assert!(matches!(missing, Err(SeedError::Io { .. })));

        let path = temp_file("broken.json", r#"{"id": "1"}"#);
        let malformed = load_items(&path).await;
        assert!(matches!(malformed, Err(SeedError::Parse { .. })));
        std::fs::remove_file(path).ok();
    }
}
