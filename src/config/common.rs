use crate::{
    config::defaults::{
        default_backoff_ms, default_idle_sweep_windows, default_max_tokens,
        default_request_timeout, default_sweep_interval, default_window_ms,
    },
    r#const::{catalog_limits, http_server_limits, rate_limit_limits},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

// 超时配置
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TimeoutConfig {
    // 请求处理超时（秒）
    #[serde(default = "default_request_timeout")]
    #[validate(range(
        min = http_server_limits::MIN_REQUEST_TIMEOUT,
        max = http_server_limits::MAX_REQUEST_TIMEOUT
    ))]
    pub request: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request: default_request_timeout(),
        }
    }
}

// 单次逻辑请求的超时与重试策略
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FetchPolicyConfig {
    // 单次尝试超时（毫秒）
    #[validate(range(
        min = catalog_limits::MIN_TIMEOUT_MS,
        max = catalog_limits::MAX_TIMEOUT_MS
    ))]
    pub timeout_ms: u64,
    // 网络失败后的最大重试次数
    #[serde(default)]
    #[validate(range(max = catalog_limits::MAX_RETRIES))]
    pub retries: u32,
    // 线性退避步长（毫秒），第 n 次重试前等待 n * backoff
    #[serde(default = "default_backoff_ms")]
    #[validate(range(max = catalog_limits::MAX_BACKOFF_MS))]
    pub backoff_ms: u64,
}

// 限流配置
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitConfig {
    // 令牌桶容量（突发上限）
    #[serde(default = "default_max_tokens")]
    #[validate(range(
        min = rate_limit_limits::MIN_MAX_TOKENS,
        max = rate_limit_limits::MAX_MAX_TOKENS
    ))]
    pub max_tokens: u32,
    // 从空桶补满所需时间（毫秒）
    #[serde(default = "default_window_ms")]
    #[validate(range(
        min = rate_limit_limits::MIN_WINDOW_MS,
        max = rate_limit_limits::MAX_WINDOW_MS
    ))]
    pub window_ms: u64,
    // 空闲超过多少个窗口的令牌桶会被清理
    #[serde(default = "default_idle_sweep_windows")]
    #[validate(range(min = 1))]
    pub idle_sweep_windows: u32,
    // 清理任务运行间隔（秒）
    #[serde(default = "default_sweep_interval")]
    #[validate(range(
        min = rate_limit_limits::MIN_SWEEP_INTERVAL,
        max = rate_limit_limits::MAX_SWEEP_INTERVAL
    ))]
    pub sweep_interval: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
            window_ms: default_window_ms(),
            idle_sweep_windows: default_idle_sweep_windows(),
            sweep_interval: default_sweep_interval(),
        }
    }
}
