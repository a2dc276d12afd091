//! 就绪检查

use std::sync::Arc;

use async_trait::async_trait;
use cart_bootstrap::{ComponentHealth, HealthIndicator};

use crate::domain::CatalogRepository;

/// 报告商品目录当前规模
pub struct CatalogHealth<C: ?Sized> {
    catalog: Arc<C>,
}

impl<C: CatalogRepository + ?Sized> CatalogHealth<C> {
    pub fn new(catalog: Arc<C>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl<C: CatalogRepository + ?Sized> HealthIndicator for CatalogHealth<C> {
    async fn check(&self) -> ComponentHealth {
        let count = self.catalog.count().await;
        ComponentHealth::healthy("catalog").with_message(format!("{} items", count))
    }
}
