//! Cart Management Service
//!
//! 商品目录与用户购物车的 gRPC 服务：一元、客户端流、服务端流和双向流四种交互模式

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::CartError;
