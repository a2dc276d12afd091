//! gRPC 服务模块

mod cart_service;
mod conversions;
mod interceptor;
mod streaming;

pub use cart_service::{CartServiceImpl, ServiceOptions};
pub use interceptor::{TraceInfo, create_request_span, tracing_interceptor};
pub use streaming::CallStream;
