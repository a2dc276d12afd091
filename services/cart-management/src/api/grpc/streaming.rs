//! 流式响应的发送端与接收端

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::DropGuard;
use tonic::Status;

use crate::application::{CallContext, Interaction, InteractionHook};
use crate::error::CartError;

/// 交给 tonic 的响应流
///
/// 持有调用的 drop guard：客户端断开后 tonic 丢弃该流，生产任务随即在下一个挂起点停止。
/// 终止状态走单独的通道，在缓冲的消息全部读完之后交付。
pub struct CallStream<T> {
    rx: mpsc::Receiver<Result<T, Status>>,
    terminal: Option<oneshot::Receiver<Status>>,
    _guard: DropGuard,
}

impl<T> Stream for CallStream<T> {
    type Item = Result<T, Status>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if let Some(message) = std::task::ready!(self.rx.poll_recv(cx)) {
            return Poll::Ready(Some(message));
        }

        let Some(terminal) = self.terminal.as_mut() else {
            return Poll::Ready(None);
        };
        let status = std::task::ready!(Pin::new(terminal).poll(cx)).ok();
        self.terminal = None;
        Poll::Ready(status.map(Err))
    }
}

/// 创建一对出站流：生产任务持有 [`Outbound`]，tonic 持有 [`CallStream`]
pub(crate) fn outbound_stream<T: Send + 'static>(
    ctx: CallContext,
    hook: Arc<dyn InteractionHook>,
    interaction: Interaction,
    buffer: usize,
) -> (Outbound<T>, CallStream<T>) {
    let (tx, rx) = mpsc::channel(buffer.max(1));
    let (terminal_tx, terminal_rx) = oneshot::channel();

    let stream = CallStream {
        rx,
        terminal: Some(terminal_rx),
        _guard: ctx.drop_guard(),
    };
    let outbound = Outbound {
        ctx,
        hook,
        interaction,
        tx,
        terminal: terminal_tx,
        sent: 0,
    };
    (outbound, stream)
}

/// 生产任务一侧：每次发送前经过钩子和调用上下文
pub(crate) struct Outbound<T> {
    ctx: CallContext,
    hook: Arc<dyn InteractionHook>,
    interaction: Interaction,
    tx: mpsc::Sender<Result<T, Status>>,
    terminal: oneshot::Sender<Status>,
    sent: usize,
}

impl<T: Send + 'static> Outbound<T> {
    pub(crate) fn ctx(&self) -> &CallContext {
        &self.ctx
    }

    pub(crate) fn sent(&self) -> usize {
        self.sent
    }

    pub(crate) async fn send(&mut self, message: T) -> Result<(), CartError> {
        self.ctx
            .guard(self.hook.before_send(self.interaction, self.sent))
            .await?;
        self.ctx
            .guard(self.tx.send(Ok(message)))
            .await?
            .map_err(|_| CartError::transport(Status::unavailable("client stopped receiving")))?;

        self.sent += 1;
        Ok(())
    }

    /// 以错误状态结束流；客户端先读完已缓冲的消息，再收到该状态
    pub(crate) fn abort(self, status: Status) {
        if self.terminal.send(status).is_err() {
            tracing::debug!("Terminal status dropped, client no longer reading");
        }
    }
}
