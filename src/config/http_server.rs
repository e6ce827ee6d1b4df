use crate::config::common::TimeoutConfig;
use crate::config::defaults::{default_admin_port, default_listen_address, default_web_port};
use serde::{Deserialize, Serialize};
use validator::Validate;

// HTTP服务器配置
#[derive(Debug, Clone, Serialize, Deserialize, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct HttpServerConfig {
    // Web 服务配置
    #[serde(default)]
    #[validate(nested)]
    pub web: WebConfig,
    // 管理服务配置
    #[serde(default)]
    pub admin: AdminConfig,
}

// Web 服务配置
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WebConfig {
    // 监听端口
    #[serde(default = "default_web_port")]
    pub port: u16,
    // 监听地址
    #[serde(default = "default_listen_address")]
    pub address: String,
    // 超时配置
    #[serde(default)]
    #[validate(nested)]
    pub timeout: TimeoutConfig,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            port: default_web_port(),
            address: default_listen_address(),
            timeout: TimeoutConfig::default(),
        }
    }
}

// 管理服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminConfig {
    // 监听端口
    #[serde(default = "default_admin_port")]
    pub port: u16,
    // 监听地址
    #[serde(default = "default_listen_address")]
    pub address: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            port: default_admin_port(),
            address: default_listen_address(),
        }
    }
}
