//! gRPC 追踪拦截器
//!
//! 负责从请求元数据中提取追踪 ID (Trace ID / Correlation ID)
//! 并将其注入到日志上下文中。

use tonic::{Request, Status};
use tracing::info_span;
use uuid::Uuid;

const TRACE_HEADERS: [&str; 3] = ["x-trace-id", "x-request-id", "x-correlation-id"];

/// 追踪信息
#[derive(Debug, Clone)]
pub struct TraceInfo {
    pub trace_id: String,
}

/// gRPC 拦截器：提取追踪 ID，都没有则生成一个
#[allow(clippy::result_large_err)]
pub fn tracing_interceptor(mut req: Request<()>) -> Result<Request<()>, Status> {
    let trace_id = TRACE_HEADERS
        .iter()
        .find_map(|header| {
            req.metadata()
                .get(*header)
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string())
        })
        .unwrap_or_else(|| Uuid::now_v7().to_string());

    req.extensions_mut().insert(TraceInfo { trace_id });

    Ok(req)
}

/// 为一次调用创建 span
pub fn create_request_span<T>(req: &Request<T>, name: &'static str) -> tracing::Span {
    let trace_id = req
        .extensions()
        .get::<TraceInfo>()
        .map(|t| t.trace_id.as_str())
        .unwrap_or("unknown");

    info_span!(
        "grpc_request",
        span_name = name,
        trace_id = %trace_id
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_existing_trace_id_is_kept() {
        let mut req = Request::new(());
        req.metadata_mut()
            .insert("x-request-id", "req-42".parse().unwrap());

        let req = tracing_interceptor(req).unwrap();
        let info = req.extensions().get::<TraceInfo>().unwrap();
        assert_eq!(info.trace_id, "req-42");
    }

    #[test]
    fn test_trace_id_header_has_priority() {
        let mut req = Request::new(());
        req.metadata_mut()
            .insert("x-correlation-id", "corr".parse().unwrap());
        req.metadata_mut()
            .insert("x-trace-id", "trace".parse().unwrap());

        let req = tracing_interceptor(req).unwrap();
        assert_eq!(req.extensions().get::<TraceInfo>().unwrap().trace_id, "trace");
    }

    #[test]
    fn test_missing_trace_id_is_generated() {
        let req = tracing_interceptor(Request::new(())).unwrap();
        let info = req.extensions().get::<TraceInfo>().unwrap();
        assert!(Uuid::parse_str(&info.trace_id).is_ok());
    }
}
