//! 内存购物车存储

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{CartRepository, Item};
use crate::error::CartError;

/// 预置的用户购物车，服务运行期间只读
#[derive(Default)]
pub struct InMemoryCartStore {
    carts: RwLock<HashMap<String, Vec<Item>>>,
}

impl InMemoryCartStore {
    pub fn new(carts: HashMap<String, Vec<Item>>) -> Self {
        Self {
            carts: RwLock::new(carts),
        }
    }

    pub async fn user_count(&self) -> usize {
        self.carts.read().await.len()
    }
}

#[async_trait]
impl CartRepository for InMemoryCartStore {
    async fn find_by_user(&self, user: &str) -> Result<Vec<Item>, CartError> {
        self.carts
            .read()
            .await
            .get(user)
            .cloned()
            .ok_or_else(|| CartError::UserNotFound(user.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup_keeps_stored_order() {
        let store = InMemoryCartStore::new(HashMap::from([(
            "myra".to_string(),
            vec![Item::new("2", "Keyboard"), Item::new("1", "Mouse")],
        )]));

        let cart = store.find_by_user("myra").await.unwrap();
        let names: Vec<_> = cart.iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, vec!["Keyboard", "Mouse"]);
        assert_eq!(store.user_count().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let store = InMemoryCartStore::default();
        assert!(matches!(
            store.find_by_user("alice").await,
            Err(CartError::UserNotFound(name)) if name == "alice"
        ));
    }
}
