//! Graceful Shutdown

use std::future::Future;

use tokio_util::sync::{CancellationToken, WaitForCancellationFutureOwned};
use tracing::info;

/// Shutdown 控制器
///
/// 每个进行中的调用都持有其子 token，触发关闭即取消全部调用。
#[derive(Clone, Debug, Default)]
pub struct ShutdownController {
    token: CancellationToken,
}

impl ShutdownController {
    pub fn new() -> Self {
        Self::default()
    }

    /// 触发关闭
    pub fn shutdown(&self) {
        info!("Triggering shutdown");
        self.token.cancel();
    }

    pub fn is_shutdown(&self) -> bool {
        self.token.is_cancelled()
    }

    /// 派生一个随关闭一起取消的子 token
    pub fn child_token(&self) -> CancellationToken {
        self.token.child_token()
    }

    /// 等待关闭信号
    pub fn wait(&self) -> WaitForCancellationFutureOwned {
        self.token.clone().cancelled_owned()
    }
}

/// 运行带有 graceful shutdown 的任务
pub async fn run_with_shutdown<F, Fut>(
    shutdown: ShutdownController,
    task: F,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<(), Box<dyn std::error::Error + Send + Sync>>> + Send,
{
    tokio::select! {
        result = task() => result,
        _ = shutdown.wait() => {
            info!("Task cancelled due to shutdown");
            Ok(())
        }
    }
}
