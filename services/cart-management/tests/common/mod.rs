//! 集成测试公共设施：在随机端口启动服务并返回客户端

use std::collections::HashMap;
use std::sync::Arc;

use cart_management::api::CartServiceImpl;
use cart_management::api::proto::cart::cart_management_client::CartManagementClient;
use cart_management::api::proto::cart::cart_management_server::CartManagementServer;
use cart_management::api::proto::cart as pb;
use cart_management::domain::{CatalogRepository, Item};
use cart_management::infrastructure::{InMemoryCartStore, InMemoryCatalog};
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tokio_util::sync::CancellationToken;
use tonic::transport::{Channel, Server};

pub struct TestServer {
    pub client: CartManagementClient<Channel>,
    pub catalog: Arc<InMemoryCatalog>,
    pub endpoint: String,
    /// 进行中调用的父 token；取消它不会停止服务器
    pub calls: CancellationToken,
    shutdown: CancellationToken,
}

impl TestServer {
    pub async fn connect(&self) -> CartManagementClient<Channel> {
        CartManagementClient::connect(self.endpoint.clone())
            .await
            .unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

pub fn item(id: &str, name: &str) -> Item {
    Item::new(id, name)
}

pub fn request_id(id: &str) -> pb::Item {
    pb::Item {
        id: id.to_string(),
        ..Default::default()
    }
}

pub async fn spawn_server(items: Vec<Item>, carts: HashMap<String, Vec<Item>>) -> TestServer {
    let catalog = Arc::new(InMemoryCatalog::default());
    for item in items {
        catalog.insert(item).await.unwrap();
    }

    let shutdown = CancellationToken::new();
    let calls = CancellationToken::new();
    let service = CartServiceImpl::new(
        catalog.clone(),
        Arc::new(InMemoryCartStore::new(carts)),
        calls.clone(),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let endpoint = format!("http://127.0.0.1:{}", addr.port());

    let server_shutdown = shutdown.clone();
    tokio::spawn(async move {
        Server::builder()
            .add_service(CartManagementServer::new(service))
            .serve_with_incoming_shutdown(
                TcpListenerStream::new(listener),
                server_shutdown.cancelled_owned(),
            )
            .await
            .unwrap();
    });

    let client = CartManagementClient::connect(endpoint.clone()).await.unwrap();

    TestServer {
        client,
        catalog,
        endpoint,
        calls,
        shutdown,
    }
}
