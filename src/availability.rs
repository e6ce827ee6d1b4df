use crate::{catalog::ResponseCache, config::AvailabilityConfig, error::AppError};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// 可用性查询客户端：按目录 id 查询各地区的流媒体/租赁/购买渠道
///
/// 查询永远不会失败：未配置密钥、上游出错或不可达时都返回 None
pub struct AvailabilityClient {
    // HTTP客户端
    client: reqwest::Client,
    // 查询地址
    search_url: Url,
    // API 密钥
    api_key: Option<String>,
    // 缓存时间
    revalidate: Duration,
    // 响应缓存
    cache: ResponseCache,
}

impl AvailabilityClient {
    pub fn new(config: &AvailabilityConfig) -> Result<Self, AppError> {
        let base = config.base_url.trim_end_matches('/');
        let search_url = Url::parse(&format!("{}/search/", base)).map_err(|e| {
            AppError::Config(format!(
                "Availability base URL '{}' is invalid: {}",
                config.base_url, e
            ))
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string);

        if api_key.is_none() {
            debug!("Availability lookups disabled: no API key configured");
        }

        Ok(Self {
            client,
            search_url,
            api_key,
            revalidate: Duration::from_secs(config.revalidate_secs),
            cache: ResponseCache::new(),
        })
    }

    /// 响应缓存，供后台清理任务共享
    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    #[inline(always)]
    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    /// 根据目录 id 查询可用性
    pub async fn lookup(&self, tmdb_id: u64) -> Option<Value> {
        let api_key = self.api_key.as_deref()?;

        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair("apiKey", api_key)
            .append_pair("search_field", "tmdb_id")
            .append_pair("search_value", &tmdb_id.to_string());

        // 缓存键不包含密钥
        let cache_key = tmdb_id.to_string();
        if let Some(body) = self.cache.get(&cache_key) {
            return Some(body);
        }

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Availability lookup for {} failed: {}", tmdb_id, e);
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(
                "Availability lookup for {} returned {}",
                tmdb_id,
                response.status()
            );
            return None;
        }

        match response.json::<Value>().await {
            Ok(body) => {
                self.cache.insert(cache_key, body.clone(), self.revalidate);
                Some(body)
            }
            Err(e) => {
                warn!("Availability response for {} unreadable: {}", tmdb_id, e);
                None
            }
        }
    }
}
