//! 应用层：调用上下文、交互钩子和添加回执

pub mod context;
pub mod hook;
pub mod report;

pub use context::{CallContext, parse_grpc_timeout};
pub use hook::{Interaction, InteractionHook, InteractionOutcome, NoopHook};
pub use report::AddReport;
