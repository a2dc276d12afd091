//! Cart Management Service - 服务入口
//!
//! 启动时从种子文件填充商品目录和用户购物车，之后仅在内存中维护

use std::sync::Arc;

use cart_bootstrap::{ServiceContext, reflection::build_reflection, run_server};
use tracing::info;

use cart_management::api::grpc::tracing_interceptor;
use cart_management::api::proto::FILE_DESCRIPTOR_SET;
use cart_management::api::proto::cart::cart_management_server::CartManagementServer;
use cart_management::api::{CartServiceImpl, ServiceOptions};
use cart_management::infrastructure::seed::{load_carts, load_items, seed_catalog};
use cart_management::infrastructure::{CatalogHealth, InMemoryCartStore, InMemoryCatalog};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    run_server("config", |ctx: ServiceContext, mut server| async move {
        info!("Initializing Cart Management Service...");

        let config = &ctx.config;

        // 商品目录
        let catalog = Arc::new(InMemoryCatalog::new(config.catalog.unique_ids));
        let items = load_items(&config.catalog.items_path).await?;
        seed_catalog(catalog.as_ref(), items).await?;

        // 用户购物车
        let carts = match &config.catalog.carts_path {
            Some(path) => InMemoryCartStore::new(load_carts(path).await?),
            None => InMemoryCartStore::default(),
        };
        let carts = Arc::new(carts);
        info!(users = carts.user_count().await, "Cart store initialized");

        ctx.health
            .register(Arc::new(CatalogHealth::new(catalog.clone())))
            .await;

        let service = CartServiceImpl::new(catalog, carts, ctx.shutdown.child_token())
            .with_options(ServiceOptions::from(&config.server));

        let reflection_service = build_reflection(&[FILE_DESCRIPTOR_SET])?;

        info!("gRPC services created");

        Ok(server
            .add_service(CartManagementServer::with_interceptor(
                service,
                tracing_interceptor,
            ))
            .add_service(reflection_service))
    })
    .await
}
