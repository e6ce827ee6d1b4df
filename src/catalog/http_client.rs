use crate::{
    catalog::{
        policy::{FetchPolicy, NetworkFailuresOnly, PolicyProfile},
        request::Credentials,
    },
    config::CatalogConfig,
    error::AppError,
};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest_middleware::ClientWithMiddleware;
use reqwest_retry::RetryTransientMiddleware;
use std::{collections::HashMap, time::Duration};
use tracing::debug;

/// 为每个策略档位创建HTTP客户端映射
pub(super) fn create_profile_clients(
    config: &CatalogConfig,
    policies: &HashMap<PolicyProfile, FetchPolicy>,
) -> Result<HashMap<PolicyProfile, ClientWithMiddleware>, AppError> {
    let mut clients = HashMap::with_capacity(policies.len());

    for (profile, policy) in policies {
        let client = create_http_client(config, policy)?;
        debug!(
            "Created catalog client for profile {:?}: {:?}",
            profile.as_str(),
            policy
        );
        clients.insert(*profile, client);
    }

    Ok(clients)
}

/// 创建HTTP客户端
pub(super) fn create_http_client(
    config: &CatalogConfig,
    policy: &FetchPolicy,
) -> Result<ClientWithMiddleware, AppError> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    // 单次尝试的超时由客户端负责，重试中间件为每次尝试重新计时
    let mut client_builder = reqwest::Client::builder()
        .default_headers(default_headers)
        .connect_timeout(Duration::from_secs(config.connect_timeout))
        .timeout(policy.timeout);

    // 配置用户代理（如果有）
    if !config.agent.is_empty() {
        client_builder = client_builder.user_agent(&config.agent);
    }

    // 创建基础HTTP客户端
    let client = client_builder.build()?;

    // 配置重试策略（仅网络失败重试，线性退避）
    let middleware_client = if policy.max_retries > 0 {
        reqwest_middleware::ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy_and_strategy(
                policy.retry_policy(),
                NetworkFailuresOnly,
            ))
            .build()
    } else {
        // 不进行重试
        reqwest_middleware::ClientBuilder::new(client).build()
    };

    Ok(middleware_client)
}

/// 添加认证信息到请求
pub(super) fn add_auth(
    request: reqwest_middleware::RequestBuilder,
    credentials: &Credentials,
) -> reqwest_middleware::RequestBuilder {
    match credentials {
        Credentials::Bearer(token) => request.bearer_auth(token),
        // API 密钥已经在 URL 中
        Credentials::ApiKey(_) => request,
    }
}
