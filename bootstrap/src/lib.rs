//! cart-bootstrap - 统一服务启动骨架
//!
//! 运行时初始化、健康检查、metrics 与 graceful shutdown

pub mod health;
pub mod metrics;
pub mod reflection;
mod runtime;
mod shutdown;
mod starter;

pub use health::{ComponentHealth, HealthChecker, HealthIndicator, HealthServer, HealthStatus};
pub use metrics::{MetricsRecorder, RequestTimer};
pub use runtime::*;
pub use shutdown::*;
pub use starter::*;
