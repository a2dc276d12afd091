use cart_errors::AppError;
use thiserror::Error;
use tonic::{Code, Status};

#[derive(Debug, Error)]
pub enum CartError {
    #[error("Item not found: {0}")]
    ItemNotFound(String),
    #[error("User not found: {0}")]
    UserNotFound(String),
    #[error("Catalog is empty")]
    EmptyCatalog,
    #[error("Item already exists: {0}")]
    DuplicateItem(String),
    #[error("Malformed item: {0}")]
    MalformedItem(String),
    #[error("Stream transport error: {0}")]
    StreamTransport(Box<Status>),
    #[error("Call canceled")]
    Canceled,
    #[error("Deadline exceeded")]
    DeadlineExceeded,
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl CartError {
    pub fn transport(status: Status) -> Self {
        Self::StreamTransport(Box::new(status))
    }

    /// 对外暴露的 gRPC 状态码
    pub fn code(&self) -> Code {
        match self {
            Self::StreamTransport(status) => status.code(),
            other => other.as_app_error().grpc_code(),
        }
    }

    fn as_app_error(&self) -> AppError {
        match self {
            Self::ItemNotFound(id) => AppError::not_found(format!("item {} does not exist", id)),
            Self::UserNotFound(name) => AppError::not_found(format!("user {} does not exist", name)),
            Self::EmptyCatalog => AppError::not_found("catalog is empty"),
            Self::DuplicateItem(id) => AppError::validation(format!("item {} already exists", id)),
            Self::MalformedItem(reason) => AppError::validation(reason.clone()),
            Self::StreamTransport(status) => AppError::from(status.as_ref().clone()),
            Self::Canceled => AppError::canceled("call canceled by client or shutdown"),
            Self::DeadlineExceeded => AppError::deadline_exceeded("call deadline expired"),
            Self::Internal(msg) => AppError::internal(msg.clone()),
        }
    }
}

impl From<CartError> for AppError {
    fn from(error: CartError) -> Self {
        error.as_app_error()
    }
}

impl From<CartError> for Status {
    fn from(error: CartError) -> Self {
        match error {
            // 传输层错误原样向上传递
            CartError::StreamTransport(status) => *status,
            other => AppError::from(other).into(),
        }
    }
}
