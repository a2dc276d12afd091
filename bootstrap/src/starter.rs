//! 服务启动器
//!
//! 提供统一的服务启动模式

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use cart_config::AppConfig;
use tonic::transport::server::Router;
use tonic::transport::Server;
use tracing::{error, info};

use crate::health::{HealthChecker, HealthServer};
use crate::metrics::MetricsRecorder;
use crate::runtime::{init_runtime, shutdown_signal};
use crate::shutdown::ShutdownController;

/// 交给服务构建闭包的启动上下文
#[derive(Clone)]
pub struct ServiceContext {
    pub config: AppConfig,
    pub shutdown: ShutdownController,
    pub health: Arc<HealthChecker>,
}

/// 运行 gRPC 服务
///
/// 1. 加载配置
/// 2. 初始化运行时（日志、追踪）
/// 3. 安装 Prometheus 记录器
/// 4. 启动健康检查 HTTP 服务器
/// 5. 调用用户提供的闭包注册 gRPC 服务
/// 6. 启动服务器并处理 graceful shutdown
///
/// # 示例
///
/// ```ignore
/// use cart_bootstrap::run_server;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     run_server("config", |ctx, mut server| async move {
///         let service = MyServiceImpl::new(ctx.shutdown.clone());
///         Ok(server.add_service(MyServiceServer::new(service)))
///     }).await
/// }
/// ```
pub async fn run_server<F, Fut>(
    config_dir: &str,
    service_builder: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(ServiceContext, Server) -> Fut,
    Fut: Future<Output = Result<Router, Box<dyn std::error::Error>>>,
{
    // 1. 加载配置
    let config = AppConfig::load(config_dir)?;

    // 2. 初始化运行时
    init_runtime(&config);

    info!("Starting {} service", config.app_name);

    // 3. 初始化 Metrics 记录器
    let metrics = Arc::new(MetricsRecorder::new()?);

    let shutdown = ShutdownController::new();
    let health_checker = Arc::new(HealthChecker::new());

    // 4. 启动健康检查 HTTP 服务器
    let health_server = HealthServer::new(
        health_checker.clone(),
        metrics.clone(),
        config.server.health_port(),
    );
    let health_shutdown = shutdown.wait();
    let health_handle = tokio::spawn(async move {
        if let Err(e) = health_server.serve(health_shutdown).await {
            error!("Health server error: {}", e);
        }
    });

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    // 5. 构建 gRPC 服务
    let ctx = ServiceContext {
        config,
        shutdown: shutdown.clone(),
        health: health_checker,
    };
    let router = service_builder(ctx, Server::builder()).await?;

    let signal_controller = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        signal_controller.shutdown();
    });

    info!(%addr, "gRPC server starting");

    // 6. 启动服务器
    router.serve_with_shutdown(addr, shutdown.wait()).await?;

    if let Err(e) = health_handle.await {
        error!("Health server task failed: {}", e);
    }

    info!("Service stopped");

    Ok(())
}
