//! cart-config - 配置加载库

use std::time::Duration;

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] figment::Error),
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// 客户端未携带 grpc-timeout 时使用的默认调用期限
    pub request_timeout_ms: Option<u64>,
    /// 流式响应的发送缓冲区大小
    #[serde(default = "default_stream_buffer")]
    pub stream_buffer: usize,
    /// 健康检查端口（默认为 gRPC 端口 + 1000）
    pub health_port: Option<u16>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    9000
}

fn default_stream_buffer() -> usize {
    16
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    pub fn health_port(&self) -> u16 {
        self.health_port
            .unwrap_or_else(|| self.port.saturating_add(1000))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_ms: None,
            stream_buffer: default_stream_buffer(),
            health_port: None,
        }
    }
}

/// 遥测配置
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// 商品目录种子数据配置
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// 商品列表 JSON 文件
    pub items_path: String,
    /// 用户购物车 JSON 文件（可选）
    pub carts_path: Option<String>,
    /// 插入时拒绝重复的商品 ID
    #[serde(default = "default_unique_ids")]
    pub unique_ids: bool,
}

fn default_unique_ids() -> bool {
    true
}

/// 应用配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app_name: String,
    #[serde(default = "default_app_env")]
    pub app_env: String,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    pub catalog: CatalogConfig,
}

fn default_app_env() -> String {
    current_env()
}

fn current_env() -> String {
    std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string())
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config: Self = Self::figment(config_dir).extract()?;
        Ok(config)
    }

    /// 配置来源：default.toml < {APP_ENV}.toml < CART_ 前缀环境变量
    pub fn figment(config_dir: &str) -> Figment {
        let env = current_env();

        Figment::new()
            .merge(Toml::file(format!("{}/default.toml", config_dir)))
            .merge(Toml::file(format!("{}/{}.toml", config_dir, env)))
            .merge(Env::prefixed("CART_").split("__"))
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }

    /// 是否为开发环境
    pub fn is_development(&self) -> bool {
        self.app_env == "development"
    }
}
