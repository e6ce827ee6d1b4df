// 导出子模块
pub mod availability;
pub mod catalog;
pub mod common;
pub mod contact;
pub mod defaults;
pub mod env;
pub mod http_server;
pub mod validation;

// 重新导出常用类型
pub use self::availability::AvailabilityConfig;
pub use self::catalog::CatalogConfig;
pub use self::common::{FetchPolicyConfig, RateLimitConfig, TimeoutConfig};
pub use self::contact::{AdminAccessConfig, ContactConfig};
pub use self::http_server::{AdminConfig, HttpServerConfig, WebConfig};

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;
use validator::Validate;

// 配置文件结构
#[derive(Debug, Clone, Serialize, Deserialize, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    // HTTP服务器配置
    #[serde(default)]
    #[validate(nested)]
    pub http_server: HttpServerConfig,
    // 目录 API 配置
    #[serde(default)]
    #[validate(nested)]
    pub catalog: CatalogConfig,
    // 可用性查询 API 配置
    #[serde(default)]
    #[validate(nested)]
    pub availability: AvailabilityConfig,
    // 联系表单限流配置
    #[serde(default)]
    #[validate(nested)]
    pub rate_limit: RateLimitConfig,
    // 联系表单配置
    #[serde(default)]
    #[validate(nested)]
    pub contact: ContactConfig,
    // 管理端访问配置
    #[serde(default)]
    pub admin: AdminAccessConfig,
}

impl Config {
    // 从文件加载配置，并叠加环境变量
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let path = path.as_ref();
        debug!("Attempting to load configuration from file: {:?}", path);

        // 打开并读取文件
        let mut file = File::open(path).map_err(|e| {
            AppError::Config(format!(
                "Unable to open configuration file {:?}: {}",
                path, e
            ))
        })?;

        let mut content = String::new();
        file.read_to_string(&mut content).map_err(|e| {
            AppError::Config(format!(
                "Unable to read configuration file {:?}: {}",
                path, e
            ))
        })?;

        let mut config = Self::parse_yaml(&content)?;

        // 叠加环境变量
        config.apply_env()?;

        // 验证配置
        config.validate()?;

        Ok(config)
    }

    // 解析YAML（不叠加环境变量，不验证）
    pub fn parse_yaml(content: &str) -> Result<Self, AppError> {
        serde_yaml::from_str(content)
            .map_err(|e| AppError::Config(format!("Configuration file parsing error: {}", e)))
    }
}
