//! 单次调用的取消与期限

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::{CancellationToken, DropGuard};
use tonic::metadata::MetadataMap;

use crate::error::CartError;

const GRPC_TIMEOUT_HEADER: &str = "grpc-timeout";

/// 调用上下文
///
/// 每个挂起点（接收前、发送前）都通过 [`CallContext::guard`] 与取消信号和期限竞争。
#[derive(Debug, Clone)]
pub struct CallContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl CallContext {
    pub fn new(token: CancellationToken, deadline: Option<Instant>) -> Self {
        Self { token, deadline }
    }

    /// 从请求元数据派生：取消信号是 `parent` 的子 token，期限取自 grpc-timeout，
    /// 缺省时使用 `default_timeout`
    pub fn from_metadata(
        metadata: &MetadataMap,
        parent: &CancellationToken,
        default_timeout: Option<Duration>,
    ) -> Self {
        let timeout = metadata
            .get(GRPC_TIMEOUT_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_grpc_timeout)
            .or(default_timeout);

        Self {
            token: parent.child_token(),
            deadline: timeout.map(|t| Instant::now() + t),
        }
    }

    /// 立即检查是否已取消或超期
    pub fn check(&self) -> Result<(), CartError> {
        if self.token.is_cancelled() {
            return Err(CartError::Canceled);
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(CartError::DeadlineExceeded);
        }
        Ok(())
    }

    /// 运行一个挂起点；取消优先于期限，期限优先于结果
    pub async fn guard<F: Future>(&self, fut: F) -> Result<F::Output, CartError> {
        self.check()?;

        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(CartError::Canceled),
            _ = deadline => Err(CartError::DeadlineExceeded),
            output = fut => Ok(output),
        }
    }

    /// [`CallContext::guard`] 的展开版本，用于本身返回 `CartError` 的操作
    pub async fn run<T, F>(&self, fut: F) -> Result<T, CartError>
    where
        F: Future<Output = Result<T, CartError>>,
    {
        self.guard(fut).await?
    }

    /// 被丢弃时取消本次调用
    pub fn drop_guard(&self) -> DropGuard {
        self.token.clone().drop_guard()
    }
}

/// 解析 gRPC 的 grpc-timeout 头，例如 `100m`、`5S`
///
/// 数值最多 8 位；单位为 H/M/S/m/u/n。
pub fn parse_grpc_timeout(value: &str) -> Option<Duration> {
    if value.len() < 2 {
        return None;
    }
    let (digits, unit) = value.split_at(value.len() - 1);
    if digits.len() > 8 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let amount: u64 = digits.parse().ok()?;

    let duration = match unit {
        "H" => Duration::from_secs(amount * 60 * 60),
        "M" => Duration::from_secs(amount * 60),
        "S" => Duration::from_secs(amount),
        "m" => Duration::from_millis(amount),
        "u" => Duration::from_micros(amount),
        "n" => Duration::from_nanos(amount),
        _ => return None,
    };
    Some(duration)
}
