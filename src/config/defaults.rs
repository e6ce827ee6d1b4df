use crate::r#const::{
    availability_limits, catalog_limits, contact_limits, http_server_limits, rate_limit_limits,
};

// 默认值函数
pub fn default_listen_address() -> String {
    "0.0.0.0".to_string()
}

pub fn default_web_port() -> u16 {
    http_server_limits::DEFAULT_WEB_PORT
}

pub fn default_admin_port() -> u16 {
    http_server_limits::DEFAULT_ADMIN_PORT
}

pub fn default_request_timeout() -> u64 {
    http_server_limits::DEFAULT_REQUEST_TIMEOUT
}

pub fn default_catalog_base_url() -> String {
    catalog_limits::DEFAULT_BASE_URL.to_string()
}

pub fn default_user_agent() -> String {
    catalog_limits::DEFAULT_USER_AGENT.to_string()
}

pub fn default_connect_timeout() -> u64 {
    catalog_limits::DEFAULT_CONNECT_TIMEOUT
}

pub fn default_cache_sweep_interval() -> u64 {
    catalog_limits::DEFAULT_CACHE_SWEEP_INTERVAL
}

pub fn default_backoff_ms() -> u64 {
    catalog_limits::DEFAULT_BACKOFF_MS
}

// 列表请求策略：短超时，不重试
pub fn default_listing_policy() -> crate::config::FetchPolicyConfig {
    crate::config::FetchPolicyConfig {
        timeout_ms: catalog_limits::DEFAULT_LISTING_TIMEOUT_MS,
        retries: catalog_limits::DEFAULT_LISTING_RETRIES,
        backoff_ms: default_backoff_ms(),
    }
}

// 详情请求策略：长超时，重试一次
pub fn default_detail_policy() -> crate::config::FetchPolicyConfig {
    crate::config::FetchPolicyConfig {
        timeout_ms: catalog_limits::DEFAULT_DETAIL_TIMEOUT_MS,
        retries: catalog_limits::DEFAULT_DETAIL_RETRIES,
        backoff_ms: default_backoff_ms(),
    }
}

pub fn default_availability_base_url() -> String {
    availability_limits::DEFAULT_BASE_URL.to_string()
}

pub fn default_availability_timeout_ms() -> u64 {
    availability_limits::DEFAULT_TIMEOUT_MS
}

pub fn default_availability_revalidate() -> u64 {
    availability_limits::DEFAULT_REVALIDATE_SECS
}

pub fn default_max_tokens() -> u32 {
    rate_limit_limits::DEFAULT_MAX_TOKENS
}

pub fn default_window_ms() -> u64 {
    rate_limit_limits::DEFAULT_WINDOW_MS
}

pub fn default_idle_sweep_windows() -> u32 {
    rate_limit_limits::DEFAULT_IDLE_SWEEP_WINDOWS
}

pub fn default_sweep_interval() -> u64 {
    rate_limit_limits::DEFAULT_SWEEP_INTERVAL
}

pub fn default_database_path() -> String {
    contact_limits::DEFAULT_DATABASE_PATH.to_string()
}

pub fn default_min_fill_ms() -> u64 {
    contact_limits::DEFAULT_MIN_FILL_MS
}

pub fn default_max_message() -> usize {
    contact_limits::DEFAULT_MAX_MESSAGE
}
