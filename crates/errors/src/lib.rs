//! cart-errors - 统一错误处理
//!
//! 基于 RFC 7807 Problem Details 规范，同时提供 gRPC 状态码映射

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 应用错误类型
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Failed precondition: {0}")]
    FailedPrecondition(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Unavailable: {0}")]
    Unavailable(String),

    #[error("Canceled: {0}")]
    Canceled(String),

    #[error("Deadline exceeded: {0}")]
    DeadlineExceeded(String),
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn failed_precondition(msg: impl Into<String>) -> Self {
        Self::FailedPrecondition(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn canceled(msg: impl Into<String>) -> Self {
        Self::Canceled(msg.into())
    }

    pub fn deadline_exceeded(msg: impl Into<String>) -> Self {
        Self::DeadlineExceeded(msg.into())
    }

    /// 转换为 HTTP 状态码
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::FailedPrecondition(_) => 412,
            Self::Internal(_) => 500,
            Self::Unavailable(_) => 503,
            Self::Canceled(_) => 499,
            Self::DeadlineExceeded(_) => 504,
        }
    }

    /// 转换为 gRPC 状态码
    pub fn grpc_code(&self) -> tonic::Code {
        match self {
            Self::NotFound(_) => tonic::Code::NotFound,
            Self::Validation(_) => tonic::Code::InvalidArgument,
            Self::FailedPrecondition(_) => tonic::Code::FailedPrecondition,
            Self::Internal(_) => tonic::Code::Internal,
            Self::Unavailable(_) => tonic::Code::Unavailable,
            Self::Canceled(_) => tonic::Code::Cancelled,
            Self::DeadlineExceeded(_) => tonic::Code::DeadlineExceeded,
        }
    }

    /// 转换为 Problem Details
    pub fn to_problem_details(&self) -> ProblemDetails {
        ProblemDetails {
            r#type: format!("https://api.cart.local/problems/{}", self.problem_slug()),
            title: self.problem_title().to_string(),
            status: self.status_code(),
            detail: self.to_string(),
            instance: None,
        }
    }

    fn problem_slug(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not-found",
            Self::Validation(_) => "validation",
            Self::FailedPrecondition(_) => "failed-precondition",
            Self::Internal(_) => "internal",
            Self::Unavailable(_) => "unavailable",
            Self::Canceled(_) => "canceled",
            Self::DeadlineExceeded(_) => "deadline-exceeded",
        }
    }

    fn problem_title(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "Resource Not Found",
            Self::Validation(_) => "Validation Error",
            Self::FailedPrecondition(_) => "Failed Precondition",
            Self::Internal(_) => "Internal Server Error",
            Self::Unavailable(_) => "Service Unavailable",
            Self::Canceled(_) => "Request Canceled",
            Self::DeadlineExceeded(_) => "Deadline Exceeded",
        }
    }
}

impl From<AppError> for tonic::Status {
    fn from(err: AppError) -> Self {
        tonic::Status::new(err.grpc_code(), err.to_string())
    }
}

impl From<tonic::Status> for AppError {
    fn from(status: tonic::Status) -> Self {
        let msg = status.message().to_string();
        match status.code() {
            tonic::Code::NotFound => Self::NotFound(msg),
            tonic::Code::InvalidArgument => Self::Validation(msg),
            tonic::Code::FailedPrecondition => Self::FailedPrecondition(msg),
            tonic::Code::Cancelled => Self::Canceled(msg),
            tonic::Code::DeadlineExceeded => Self::DeadlineExceeded(msg),
            tonic::Code::Unavailable => Self::Unavailable(msg),
            _ => Self::Internal(msg),
        }
    }
}

/// RFC 7807 Problem Details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    pub r#type: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

/// Result 类型别名
pub type AppResult<T> = Result<T, AppError>;
