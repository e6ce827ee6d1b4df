use crate::{
    catalog::{
        cache::ResponseCache,
        http_client::{add_auth, create_profile_clients},
        policy::{Criticality, FetchPolicy, PolicyProfile},
        request::{build_request_url, Credentials, Query},
    },
    config::CatalogConfig,
    error::AppError,
    metrics::METRICS,
    r#const::error_labels,
};
use reqwest::StatusCode;
use reqwest_middleware::ClientWithMiddleware;
use serde_json::{json, Value};
use std::{
    collections::HashMap,
    time::{Duration, Instant},
};
use tracing::{debug, info, warn};

/// 非关键端点失败时返回的空结果
pub fn empty_results() -> Value {
    json!({ "results": [] })
}

/// 单次请求选项
#[derive(Debug, Clone)]
pub struct FetchOptions {
    // 策略档位（决定超时与重试）
    pub profile: PolicyProfile,
    // 关键性，None 时按路径分类
    pub criticality: Option<Criticality>,
    // 成功响应的缓存时间（秒），0 表示不缓存
    pub revalidate_secs: u64,
    // 覆盖档位的单次尝试超时
    pub timeout: Option<Duration>,
}

impl FetchOptions {
    pub fn listing() -> Self {
        Self {
            profile: PolicyProfile::Listing,
            criticality: None,
            revalidate_secs: 0,
            timeout: None,
        }
    }

    pub fn detail() -> Self {
        Self {
            profile: PolicyProfile::Detail,
            ..Self::listing()
        }
    }

    pub fn with_criticality(mut self, criticality: Criticality) -> Self {
        self.criticality = Some(criticality);
        self
    }

    pub fn with_revalidate(mut self, secs: u64) -> Self {
        self.revalidate_secs = secs;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// 目录 API 客户端：超时、有限重试、按关键性降级
pub struct CatalogClient {
    // API 基础地址
    base_url: String,
    // 凭据
    credentials: Credentials,
    // 各档位HTTP客户端
    clients: HashMap<PolicyProfile, ClientWithMiddleware>,
    // 响应缓存
    cache: ResponseCache,
}

impl CatalogClient {
    /// 创建客户端，缺少凭据时在任何网络请求之前返回配置错误
    pub fn new(config: &CatalogConfig) -> Result<Self, AppError> {
        let credentials = Credentials::resolve(
            config.bearer_token.as_deref(),
            config.api_key.as_deref(),
        )?;

        let mut policies = HashMap::with_capacity(PolicyProfile::ALL.len());
        policies.insert(
            PolicyProfile::Listing,
            FetchPolicy::from_config(&config.listing),
        );
        policies.insert(
            PolicyProfile::Detail,
            FetchPolicy::from_config(&config.detail),
        );

        let clients = create_profile_clients(config, &policies)?;

        info!(
            "Catalog client initialized: {:?}, credentials: {:?}",
            config.base_url, credentials
        );

        Ok(Self {
            base_url: config.base_url.clone(),
            credentials,
            clients,
            cache: ResponseCache::new(),
        })
    }

    /// 响应缓存，供后台清理任务共享
    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// 读取一个 JSON 资源
    ///
    /// - 2xx：返回解析后的响应体
    /// - 404/408 且端点非关键：返回 `{ "results": [] }`
    /// - 其他状态码：返回携带状态码的上游错误
    /// - 网络失败：按策略重试，耗尽后非关键端点降级，关键端点返回上游错误
    pub async fn fetch_json(
        &self,
        path: &str,
        query: &Query,
        options: &FetchOptions,
    ) -> Result<Value, AppError> {
        let criticality = options
            .criticality
            .unwrap_or_else(|| Criticality::from_path(path));
        let profile = options.profile.as_str();

        let url = build_request_url(&self.base_url, path, query, &self.credentials)?;

        // 命中缓存直接返回
        if options.revalidate_secs > 0 {
            if let Some(body) = self.cache.get(url.as_str()) {
                debug!("Catalog cache hit: {:?}", path);
                return Ok(body);
            }
        }

        // 获取档位的HTTP客户端
        let client = self.clients.get(&options.profile).ok_or_else(|| {
            AppError::Internal(format!("HTTP client not found for profile {}", profile))
        })?;

        let mut request = add_auth(client.get(url.clone()), &self.credentials);
        if let Some(timeout) = options.timeout {
            request = request.timeout(timeout);
        }

        METRICS
            .upstream_requests_total()
            .with_label_values(&[profile])
            .inc();

        // 记录开始时间
        let start_time = Instant::now();
        let result = request.send().await;
        METRICS
            .upstream_duration_seconds()
            .with_label_values(&[profile])
            .observe(start_time.elapsed().as_secs_f64());

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                // 重试已由中间件完成，这里只处理最终结果
                METRICS
                    .upstream_errors_total()
                    .with_label_values(&[error_labels::NETWORK_ERROR, profile])
                    .inc();

                if !criticality.is_critical() {
                    warn!("Catalog unreachable, degrading {:?}: {}", path, e);
                    return Ok(self.fallback(profile));
                }

                warn!("Catalog unreachable for {:?}: {}", path, e);
                return Err(AppError::Upstream {
                    path: path.to_string(),
                    status: None,
                    reason: e.to_string(),
                });
            }
        };

        let status = response.status();
        if !status.is_success() {
            METRICS
                .upstream_errors_total()
                .with_label_values(&[error_labels::STATUS_ERROR, profile])
                .inc();

            let degradable = matches!(status, StatusCode::NOT_FOUND | StatusCode::REQUEST_TIMEOUT);
            if degradable && !criticality.is_critical() {
                warn!("Catalog {} for {:?}, degrading to empty results", status, path);
                return Ok(self.fallback(profile));
            }

            warn!("Catalog {} for {:?}", status, path);
            return Err(AppError::Upstream {
                path: path.to_string(),
                status: Some(status.as_u16()),
                reason: format!("Upstream responded with {}", status),
            });
        }

        let body = match response.json::<Value>().await {
            Ok(body) => body,
            Err(e) => {
                METRICS
                    .upstream_errors_total()
                    .with_label_values(&[error_labels::DECODE_ERROR, profile])
                    .inc();

                if !criticality.is_critical() {
                    warn!("Catalog body unreadable, degrading {:?}: {}", path, e);
                    return Ok(self.fallback(profile));
                }

                return Err(AppError::Upstream {
                    path: path.to_string(),
                    status: Some(status.as_u16()),
                    reason: format!("Unreadable response body: {}", e),
                });
            }
        };

        debug!(
            "Catalog {} for {:?} in {}ms",
            status,
            path,
            start_time.elapsed().as_millis()
        );

        self.cache.insert(
            url.into(),
            body.clone(),
            Duration::from_secs(options.revalidate_secs),
        );

        Ok(body)
    }

    // 降级结果，不写入缓存
    fn fallback(&self, profile: &str) -> Value {
        METRICS
            .upstream_fallbacks_total()
            .with_label_values(&[profile])
            .inc();
        empty_results()
    }
}
