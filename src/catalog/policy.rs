use crate::config::FetchPolicyConfig;
use crate::r#const::profile_labels;
use reqwest_retry::{Retryable, RetryableStrategy};
use retry_policies::{RetryDecision, RetryPolicy};
use std::time::{Duration, SystemTime};

// 非关键子资源路径片段：这些请求失败时降级为空结果
const NON_CRITICAL_FRAGMENTS: [&str; 6] = [
    "/videos",
    "/images",
    "/credits",
    "/similar",
    "/recommendations",
    "/watch/providers",
];

/// 端点关键性：决定失败时是向上传播还是降级为空结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criticality {
    // 失败向调用方传播
    Critical,
    // 失败降级为 `{ "results": [] }`
    NonCritical,
}

impl Criticality {
    /// 根据路径片段分类，仅用于未指明操作的原始请求
    pub fn from_path(path: &str) -> Self {
        if NON_CRITICAL_FRAGMENTS
            .iter()
            .any(|fragment| path.contains(fragment))
        {
            Criticality::NonCritical
        } else {
            Criticality::Critical
        }
    }

    #[inline(always)]
    pub fn is_critical(self) -> bool {
        matches!(self, Criticality::Critical)
    }
}

/// 策略档位，每个档位拥有独立的 HTTP 客户端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyProfile {
    // 首页/列表：快速失败
    Listing,
    // 详情页：更长超时，允许重试
    Detail,
}

impl PolicyProfile {
    pub const ALL: [PolicyProfile; 2] = [PolicyProfile::Listing, PolicyProfile::Detail];

    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyProfile::Listing => profile_labels::LISTING,
            PolicyProfile::Detail => profile_labels::DETAIL,
        }
    }
}

/// 单次逻辑请求的超时、重试与退避策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPolicy {
    // 单次尝试超时
    pub timeout: Duration,
    // 网络失败后的最大重试次数，总尝试次数为 max_retries + 1
    pub max_retries: u32,
    // 线性退避步长
    pub backoff: Duration,
}

impl FetchPolicy {
    pub fn from_config(config: &FetchPolicyConfig) -> Self {
        Self {
            timeout: Duration::from_millis(config.timeout_ms),
            max_retries: config.retries,
            backoff: Duration::from_millis(config.backoff_ms),
        }
    }

    /// 第 `attempt` 次重试（从 1 开始）前的等待时间
    #[inline]
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.backoff.saturating_mul(attempt)
    }

    /// 转换为重试中间件使用的退避策略
    pub fn retry_policy(&self) -> LinearBackoff {
        LinearBackoff { policy: *self }
    }
}

/// 线性退避：第 n 次重试前等待 n * backoff
#[derive(Debug, Clone, Copy)]
pub struct LinearBackoff {
    policy: FetchPolicy,
}

impl RetryPolicy for LinearBackoff {
    fn should_retry(&self, _request_start_time: SystemTime, n_past_retries: u32) -> RetryDecision {
        if n_past_retries >= self.policy.max_retries {
            return RetryDecision::DoNotRetry;
        }

        RetryDecision::Retry {
            execute_after: SystemTime::now() + self.policy.backoff_for(n_past_retries + 1),
        }
    }
}

/// 只把网络层失败（超时、连接失败、连接重置）视为瞬时错误，状态码一律不重试
#[derive(Debug, Clone, Copy, Default)]
pub struct NetworkFailuresOnly;

impl RetryableStrategy for NetworkFailuresOnly {
    fn handle(
        &self,
        res: &Result<reqwest::Response, reqwest_middleware::Error>,
    ) -> Option<Retryable> {
        match res {
            Ok(_) => None,
            Err(error) if is_network_failure(error) => Some(Retryable::Transient),
            Err(_) => Some(Retryable::Fatal),
        }
    }
}

/// 判断请求错误是否为网络层失败
pub fn is_network_failure(error: &reqwest_middleware::Error) -> bool {
    match error {
        reqwest_middleware::Error::Reqwest(e) => e.is_timeout() || e.is_connect() || e.is_request(),
        reqwest_middleware::Error::Middleware(_) => false,
    }
}
