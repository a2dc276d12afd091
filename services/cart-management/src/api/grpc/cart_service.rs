//! CartManagement gRPC 服务实现

use std::sync::Arc;
use std::time::Duration;

use cart_bootstrap::RequestTimer;
use cart_config::ServerConfig;
use tokio_util::sync::CancellationToken;
use tonic::{Code, Request, Response, Status, Streaming};
use tracing::{Instrument, debug, info, warn};

use super::interceptor::create_request_span;
use super::streaming::{CallStream, Outbound, outbound_stream};
use crate::api::proto::cart::{self as pb, cart_management_server::CartManagement};
use crate::application::{
    AddReport, CallContext, Interaction, InteractionHook, InteractionOutcome, NoopHook,
};
use crate::domain::{CartRepository, CatalogRepository, Item, ReportSummary, User};
use crate::error::CartError;

const SERVICE_NAME: &str = "cart.v1.CartManagement";

/// 服务运行参数
#[derive(Debug, Clone)]
pub struct ServiceOptions {
    /// 客户端未携带 grpc-timeout 时的调用期限
    pub default_timeout: Option<Duration>,
    /// 流式响应缓冲区大小
    pub stream_buffer: usize,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            default_timeout: None,
            stream_buffer: 16,
        }
    }
}

impl From<&ServerConfig> for ServiceOptions {
    fn from(config: &ServerConfig) -> Self {
        Self {
            default_timeout: config.request_timeout(),
            stream_buffer: config.stream_buffer,
        }
    }
}

/// CartManagement gRPC 服务
///
/// 两个存储在启动时构造，通过 `Arc` 共享给每一次调用。
pub struct CartServiceImpl<C, K>
where
    C: CatalogRepository + 'static,
    K: CartRepository + 'static,
{
    catalog: Arc<C>,
    carts: Arc<K>,
    hook: Arc<dyn InteractionHook>,
    shutdown: CancellationToken,
    options: ServiceOptions,
}

impl<C, K> CartServiceImpl<C, K>
where
    C: CatalogRepository + 'static,
    K: CartRepository + 'static,
{
    /// `shutdown` 被取消时所有进行中的调用以 Canceled 结束
    pub fn new(catalog: Arc<C>, carts: Arc<K>, shutdown: CancellationToken) -> Self {
        Self {
            catalog,
            carts,
            hook: Arc::new(NoopHook),
            shutdown,
            options: ServiceOptions::default(),
        }
    }

    pub fn with_hook(mut self, hook: Arc<dyn InteractionHook>) -> Self {
        self.hook = hook;
        self
    }

    pub fn with_options(mut self, options: ServiceOptions) -> Self {
        self.options = options;
        self
    }

    fn call_context<T>(&self, request: &Request<T>) -> CallContext {
        CallContext::from_metadata(
            request.metadata(),
            &self.shutdown,
            self.options.default_timeout,
        )
    }

    fn complete<T>(
        &self,
        interaction: Interaction,
        timer: RequestTimer,
        result: Result<T, CartError>,
    ) -> Result<T, Status> {
        match result {
            Ok(value) => {
                report(self.hook.as_ref(), interaction, timer, None);
                Ok(value)
            }
            Err(e) => Err(self.fail(interaction, timer, e)),
        }
    }

    fn fail(&self, interaction: Interaction, timer: RequestTimer, error: CartError) -> Status {
        report(self.hook.as_ref(), interaction, timer, Some(&error));
        error.into()
    }

    /// 逐项应用：校验失败的条目被计数后跳过，读流错误立即终止且不回滚已插入的条目
    async fn apply_additions(
        &self,
        ctx: &CallContext,
        inbound: &mut Streaming<pb::Item>,
    ) -> Result<ReportSummary, CartError> {
        let mut report = AddReport::default();

        while let Some(message) = ctx
            .guard(inbound.message())
            .await?
            .map_err(CartError::transport)?
        {
            let item = Item::from(message);
            let id = item.id.clone();

            let applied = match item.validate() {
                Ok(()) => ctx.run(self.catalog.insert(item)).await,
                Err(e) => Err(e),
            };

            match applied {
                Ok(()) => {
                    metrics::counter!("catalog_items_added_total").increment(1);
                    report.record_added(id);
                }
                Err(e @ (CartError::DuplicateItem(_) | CartError::MalformedItem(_))) => {
                    warn!(item_id = %id, error = %e, "Item rejected");
                    metrics::counter!("catalog_items_rejected_total").increment(1);
                    report.record_rejected();
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            added = report.added(),
            rejected = report.rejected(),
            "Add stream finished"
        );
        let current = self.catalog.count().await;
        Ok(report.into_summary(current))
    }
}

/// 记录调用结局：日志、metrics、钩子
fn report(
    hook: &dyn InteractionHook,
    interaction: Interaction,
    timer: RequestTimer,
    error: Option<&CartError>,
) {
    let outcome = match error {
        None => {
            debug!(method = interaction.as_str(), "Interaction completed");
            InteractionOutcome::Completed
        }
        Some(e) => {
            let code = e.code();
            match code {
                Code::NotFound
                | Code::InvalidArgument
                | Code::Cancelled
                | Code::DeadlineExceeded => {
                    info!(method = interaction.as_str(), error = %e, "Interaction aborted")
                }
                _ => warn!(method = interaction.as_str(), error = %e, "Interaction failed"),
            }
            InteractionOutcome::Aborted(code)
        }
    };

    timer.finish(outcome.label());
    hook.on_finish(interaction, &outcome);
}

/// 流式生产任务结束：记录结局，失败时把状态推给客户端
fn finish_stream(
    hook: &dyn InteractionHook,
    interaction: Interaction,
    timer: RequestTimer,
    outbound: Outbound<pb::Item>,
    result: Result<(), CartError>,
) {
    report(hook, interaction, timer, result.as_ref().err());
    debug!(sent = outbound.sent(), "Outbound stream closed");

    if let Err(e) = result {
        outbound.abort(e.into());
    }
}

/// 逐个处理入站用户，每个用户的商品全部发出后才读取下一个用户
async fn serve_carts<K>(
    carts: &K,
    inbound: &mut Streaming<pb::User>,
    outbound: &mut Outbound<pb::Item>,
) -> Result<(), CartError>
where
    K: CartRepository + ?Sized,
{
    let ctx = outbound.ctx().clone();

    while let Some(message) = ctx
        .guard(inbound.message())
        .await?
        .map_err(CartError::transport)?
    {
        let user = User::from(message);
        debug!(user = %user.name, "Processing user");

        let cart = match ctx.run(carts.find_by_user(&user.name)).await {
            Ok(items) => items,
            Err(CartError::UserNotFound(_)) => vec![Item::unknown_user()],
            Err(e) => return Err(e),
        };

        for item in cart {
            outbound.send(item.into()).await?;
        }
    }

    info!("Done processing all users");
    Ok(())
}

#[tonic::async_trait]
impl<C, K> CartManagement for CartServiceImpl<C, K>
where
    C: CatalogRepository + 'static,
    K: CartRepository + 'static,
{
    async fn retrieve(&self, request: Request<pb::Item>) -> Result<Response<pb::Item>, Status> {
        let span = create_request_span(&request, "Retrieve");
        let ctx = self.call_context(&request);
        let timer = RequestTimer::new(SERVICE_NAME, "Retrieve");
        let id = request.into_inner().id;

        let result = async {
            debug!(item_id = %id, "Retrieving item");
            ctx.run(self.catalog.find_by_id(&id)).await
        }
        .instrument(span)
        .await;

        self.complete(Interaction::Retrieve, timer, result)
            .map(|item| Response::new(item.into()))
    }

    async fn add(
        &self,
        request: Request<Streaming<pb::Item>>,
    ) -> Result<Response<pb::ReportSummary>, Status> {
        let span = create_request_span(&request, "Add");
        let ctx = self.call_context(&request);
        let timer = RequestTimer::new(SERVICE_NAME, "Add");
        let mut inbound = request.into_inner();

        let result = self
            .apply_additions(&ctx, &mut inbound)
            .instrument(span)
            .await;

        self.complete(Interaction::Add, timer, result)
            .map(|summary| Response::new(summary.into()))
    }

    async fn delete(
        &self,
        request: Request<pb::Item>,
    ) -> Result<Response<pb::ReportSummary>, Status> {
        let span = create_request_span(&request, "Delete");
        let ctx = self.call_context(&request);
        let timer = RequestTimer::new(SERVICE_NAME, "Delete");
        let id = request.into_inner().id;

        let result = async {
            info!(item_id = %id, "Deleting item");
            ctx.run(self.catalog.delete(&id)).await
        }
        .instrument(span)
        .await;

        self.complete(Interaction::Delete, timer, result)
            .map(|summary| Response::new(summary.into()))
    }

    type ListStream = CallStream<pb::Item>;

    async fn list(&self, request: Request<pb::Item>) -> Result<Response<Self::ListStream>, Status> {
        let span = create_request_span(&request, "List");
        let ctx = self.call_context(&request);
        let timer = RequestTimer::new(SERVICE_NAME, "List");
        let category = request.into_inner().category;

        // 快照在读锁下一次性取得，之后的发送不再持有锁
        let snapshot = ctx
            .run(self.catalog.snapshot())
            .instrument(span.clone())
            .await
            .and_then(|items| {
                if items.is_empty() {
                    Err(CartError::EmptyCatalog)
                } else {
                    Ok(items)
                }
            });
        let items = match snapshot {
            Ok(items) => items,
            Err(e) => return Err(self.fail(Interaction::List, timer, e)),
        };

        let items: Vec<Item> = if category.is_empty() {
            items
        } else {
            items
                .into_iter()
                .filter(|item| item.category.eq_ignore_ascii_case(&category))
                .collect()
        };

        let (mut outbound, stream) = outbound_stream(
            ctx,
            self.hook.clone(),
            Interaction::List,
            self.options.stream_buffer,
        );
        let hook = self.hook.clone();

        tokio::spawn(
            async move {
                let mut result = Ok(());
                for item in items {
                    if let Err(e) = outbound.send(item.into()).await {
                        result = Err(e);
                        break;
                    }
                }
                finish_stream(hook.as_ref(), Interaction::List, timer, outbound, result);
            }
            .instrument(span),
        );

        Ok(Response::new(stream))
    }

    type GetCartStream = CallStream<pb::Item>;

    async fn get_cart(
        &self,
        request: Request<Streaming<pb::User>>,
    ) -> Result<Response<Self::GetCartStream>, Status> {
        let span = create_request_span(&request, "GetCart");
        let ctx = self.call_context(&request);
        let timer = RequestTimer::new(SERVICE_NAME, "GetCart");
        let mut inbound = request.into_inner();

        let (mut outbound, stream) = outbound_stream(
            ctx,
            self.hook.clone(),
            Interaction::GetCart,
            self.options.stream_buffer,
        );
        let hook = self.hook.clone();
        let carts = self.carts.clone();

        tokio::spawn(
            async move {
                let result = serve_carts(carts.as_ref(), &mut inbound, &mut outbound).await;
                finish_stream(hook.as_ref(), Interaction::GetCart, timer, outbound, result);
            }
            .instrument(span),
        );

        Ok(Response::new(stream))
    }
}
