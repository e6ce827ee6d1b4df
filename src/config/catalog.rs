use crate::config::common::FetchPolicyConfig;
use crate::config::defaults::{
    default_cache_sweep_interval, default_catalog_base_url, default_connect_timeout,
    default_detail_policy, default_listing_policy, default_user_agent,
};
use crate::r#const::catalog_limits;
use serde::{Deserialize, Serialize};
use validator::Validate;

// 目录 API 客户端配置
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CatalogConfig {
    // API 基础地址
    #[serde(default = "default_catalog_base_url")]
    #[validate(length(min = 1, message = "Catalog base URL cannot be empty"))]
    pub base_url: String,
    // Bearer 令牌（优先使用）
    #[serde(default)]
    pub bearer_token: Option<String>,
    // 查询参数形式的 API 密钥
    #[serde(default)]
    pub api_key: Option<String>,
    // 用户代理
    #[serde(default = "default_user_agent")]
    pub agent: String,
    // 连接超时（秒）
    #[serde(default = "default_connect_timeout")]
    #[validate(range(
        min = catalog_limits::MIN_CONNECT_TIMEOUT,
        max = catalog_limits::MAX_CONNECT_TIMEOUT
    ))]
    pub connect_timeout: u64,
    // 列表/首页请求策略
    #[serde(default = "default_listing_policy")]
    #[validate(nested)]
    pub listing: FetchPolicyConfig,
    // 详情页请求策略
    #[serde(default = "default_detail_policy")]
    #[validate(nested)]
    pub detail: FetchPolicyConfig,
    // 过期响应清理间隔（秒），同时作用于可用性查询缓存
    #[serde(default = "default_cache_sweep_interval")]
    #[validate(range(
        min = catalog_limits::MIN_CACHE_SWEEP_INTERVAL,
        max = catalog_limits::MAX_CACHE_SWEEP_INTERVAL
    ))]
    pub cache_sweep_interval: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_catalog_base_url(),
            bearer_token: None,
            api_key: None,
            agent: default_user_agent(),
            connect_timeout: default_connect_timeout(),
            listing: default_listing_policy(),
            detail: default_detail_policy(),
            cache_sweep_interval: default_cache_sweep_interval(),
        }
    }
}
