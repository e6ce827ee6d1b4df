use crate::config::defaults::{
    default_availability_base_url, default_availability_revalidate,
    default_availability_timeout_ms,
};
use crate::r#const::catalog_limits;
use serde::{Deserialize, Serialize};
use validator::Validate;

// 可用性查询 API 配置，未配置密钥时整个查询被跳过
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityConfig {
    // API 基础地址
    #[serde(default = "default_availability_base_url")]
    #[validate(length(min = 1, message = "Availability base URL cannot be empty"))]
    pub base_url: String,
    // API 密钥
    #[serde(default)]
    pub api_key: Option<String>,
    // 请求超时（毫秒）
    #[serde(default = "default_availability_timeout_ms")]
    #[validate(range(
        min = catalog_limits::MIN_TIMEOUT_MS,
        max = catalog_limits::MAX_TIMEOUT_MS
    ))]
    pub timeout_ms: u64,
    // 结果缓存时间（秒）
    #[serde(default = "default_availability_revalidate")]
    pub revalidate_secs: u64,
}

impl Default for AvailabilityConfig {
    fn default() -> Self {
        Self {
            base_url: default_availability_base_url(),
            api_key: None,
            timeout_ms: default_availability_timeout_ms(),
            revalidate_secs: default_availability_revalidate(),
        }
    }
}
