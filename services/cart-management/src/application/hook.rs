//! 交互钩子
//!
//! 生产环境使用 [`NoopHook`]；测试通过钩子控制流式发送的交错时机并观察调用结局。

use async_trait::async_trait;
use tonic::Code;

/// 服务方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interaction {
    Retrieve,
    Add,
    Delete,
    List,
    GetCart,
}

impl Interaction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Retrieve => "Retrieve",
            Self::Add => "Add",
            Self::Delete => "Delete",
            Self::List => "List",
            Self::GetCart => "GetCart",
        }
    }
}

/// 调用结局
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionOutcome {
    Completed,
    Aborted(Code),
}

impl InteractionOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Completed => "ok",
            Self::Aborted(Code::NotFound) => "not_found",
            Self::Aborted(Code::InvalidArgument) => "invalid_argument",
            Self::Aborted(Code::Cancelled) => "canceled",
            Self::Aborted(Code::DeadlineExceeded) => "deadline_exceeded",
            Self::Aborted(Code::Unavailable) => "unavailable",
            Self::Aborted(_) => "error",
        }
    }
}

#[async_trait]
pub trait InteractionHook: Send + Sync + 'static {
    /// 每条出站流消息发送前调用；`sequence` 为本次调用内从 0 开始的消息序号
    async fn before_send(&self, _interaction: Interaction, _sequence: usize) {}

    /// 调用到达 Completed 或 Aborted 时调用一次
    fn on_finish(&self, _interaction: Interaction, _outcome: &InteractionOutcome) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHook;

impl InteractionHook for NoopHook {}
