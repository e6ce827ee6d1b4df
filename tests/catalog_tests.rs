use cinevault::{
    availability::AvailabilityClient,
    catalog::{CatalogClient, FetchOptions, MediaType, Query},
    config::{AvailabilityConfig, CatalogConfig, FetchPolicyConfig},
    error::AppError,
};
use serde_json::json;
use std::time::Duration;
use wiremock::{
    matchers::{header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

/// 创建指向模拟服务器的目录配置：列表 300ms 不重试，详情 300ms 重试一次
fn catalog_config(server: &MockServer) -> CatalogConfig {
    CatalogConfig {
        base_url: server.uri(),
        bearer_token: Some("test-token".to_string()),
        listing: FetchPolicyConfig {
            timeout_ms: 300,
            retries: 0,
            backoff_ms: 0,
        },
        detail: FetchPolicyConfig {
            timeout_ms: 300,
            retries: 1,
            backoff_ms: 10,
        },
        ..Default::default()
    }
}

// 超过请求超时的响应延迟
const SLOW: Duration = Duration::from_secs(2);

/// 缺少凭据时在任何网络请求之前返回配置错误
#[tokio::test]
async fn test_missing_credentials_fail_before_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = CatalogConfig {
        bearer_token: None,
        api_key: Some("   ".to_string()),
        ..catalog_config(&server)
    };

    let result = CatalogClient::new(&config);
    assert!(matches!(result, Err(AppError::Config(_))));
}

/// 非关键端点 404 / 408 降级为空结果
#[tokio::test]
async fn test_non_critical_missing_degrades_to_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movie/popular"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/movie/550/credits"))
        .respond_with(ResponseTemplate::new(408))
        .expect(1)
        .mount(&server)
        .await;

    let client = CatalogClient::new(&catalog_config(&server)).unwrap();

    assert_eq!(client.popular_movies(1).await.unwrap(), json!({"results": []}));
    assert_eq!(client.movie_credits(550).await.unwrap(), json!({"results": []}));
}

/// 关键端点 404 返回携带状态码的上游错误
#[tokio::test]
async fn test_critical_missing_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movie/999"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = CatalogClient::new(&catalog_config(&server)).unwrap();

    let err = client.movie_details(999).await.unwrap_err();
    assert_eq!(err.upstream_status(), Some(404));
}

/// 服务端错误状态码不重试，关键与非关键端点都返回错误
#[tokio::test]
async fn test_server_errors_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movie/42"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/trending/movie/day"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let client = CatalogClient::new(&catalog_config(&server)).unwrap();

    let err = client
        .title(42, MediaType::Movie, None)
        .await
        .unwrap_err();
    assert_eq!(err.upstream_status(), Some(500));

    let err = client.trending_all(1).await.unwrap_err();
    assert_eq!(err.upstream_status(), Some(503));
}

/// 关键端点超时：重试一次后返回无状态码的上游错误
#[tokio::test]
async fn test_critical_timeout_retries_then_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movie/7"))
        .respond_with(ResponseTemplate::new(200).set_delay(SLOW))
        .expect(2)
        .mount(&server)
        .await;

    let client = CatalogClient::new(&catalog_config(&server)).unwrap();

    let err = client.movie_details(7).await.unwrap_err();
    assert!(matches!(err, AppError::Upstream { status: None, .. }));
}

/// 非关键端点超时：重试耗尽后降级为空结果
#[tokio::test]
async fn test_non_critical_timeout_retries_then_degrades() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movie/7/videos"))
        .respond_with(ResponseTemplate::new(200).set_delay(SLOW))
        .expect(2)
        .mount(&server)
        .await;

    let client = CatalogClient::new(&catalog_config(&server)).unwrap();

    assert_eq!(client.movie_videos(7).await.unwrap(), json!({"results": []}));
}

/// 列表档位不重试，超时直接降级
#[tokio::test]
async fn test_listing_timeout_fails_fast() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/discover/movie"))
        .respond_with(ResponseTemplate::new(200).set_delay(SLOW))
        .expect(1)
        .mount(&server)
        .await;

    let client = CatalogClient::new(&catalog_config(&server)).unwrap();

    let start = std::time::Instant::now();
    let body = client.discover_movies(&Default::default()).await.unwrap();
    assert_eq!(body, json!({"results": []}));
    assert!(start.elapsed() < SLOW);
}

/// 瞬时网络失败后重试成功
#[tokio::test]
async fn test_retry_recovers_after_transient_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movie/11"))
        .respond_with(ResponseTemplate::new(200).set_delay(SLOW))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/movie/11"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": 11, "title": "Star Wars"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = CatalogClient::new(&catalog_config(&server)).unwrap();

    let body = client.movie_details(11).await.unwrap();
    assert_eq!(body["title"], "Star Wars");
}

/// Bearer 凭据走请求头，不出现在查询参数中
#[tokio::test]
async fn test_bearer_credentials_use_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/multi"))
        .and(header("authorization", "Bearer test-token"))
        .and(query_param("query", "dune"))
        .and(query_param("include_adult", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": [{"id": 1}]})))
        .expect(1)
        .mount(&server)
        .await;

    let client = CatalogClient::new(&CatalogConfig {
        api_key: Some("ignored".to_string()),
        ..catalog_config(&server)
    })
    .unwrap();

    let body = client.search_titles(" dune ", 1).await.unwrap();
    assert_eq!(body["results"][0]["id"], 1);

    let requests = server.received_requests().await.unwrap();
    assert!(!requests[0].url.query().unwrap_or_default().contains("api_key"));
}

/// API 密钥凭据追加到查询参数
#[tokio::test]
async fn test_api_key_credentials_use_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/genre/movie/list"))
        .and(query_param("api_key", "k-123"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"genres": [{"id": 28, "name": "Action"}]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = CatalogClient::new(&CatalogConfig {
        bearer_token: None,
        api_key: Some("k-123".to_string()),
        ..catalog_config(&server)
    })
    .unwrap();

    let genres = client.movie_genres().await.unwrap();
    assert_eq!(genres, vec![json!({"id": 28, "name": "Action"})]);

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

/// 成功响应在缓存时间内复用，降级结果不缓存
#[tokio::test]
async fn test_successful_bodies_are_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movie/popular"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": [{"id": 5}]})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/movie/3/similar"))
        .respond_with(ResponseTemplate::new(404))
        .expect(2)
        .mount(&server)
        .await;

    let client = CatalogClient::new(&catalog_config(&server)).unwrap();

    let first = client.popular_movies(1).await.unwrap();
    let second = client.popular_movies(1).await.unwrap();
    assert_eq!(first, second);

    client.similar_movies(3, 1).await.unwrap();
    client.similar_movies(3, 1).await.unwrap();
}

/// 原始路径请求按路径片段判断关键性
#[tokio::test]
async fn test_raw_fetch_classifies_by_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = CatalogClient::new(&catalog_config(&server)).unwrap();
    let options = FetchOptions::detail();

    let body = client
        .fetch_json("/tv/1399/watch/providers", &Query::new(), &options)
        .await
        .unwrap();
    assert_eq!(body, json!({"results": []}));

    let err = client
        .fetch_json("/tv/1399", &Query::new(), &options)
        .await
        .unwrap_err();
    assert_eq!(err.upstream_status(), Some(404));
}

/// 未配置可用性密钥时不发起请求
#[tokio::test]
async fn test_availability_without_key_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = AvailabilityClient::new(&AvailabilityConfig {
        base_url: server.uri(),
        ..Default::default()
    })
    .unwrap();

    assert!(!client.is_enabled());
    assert_eq!(client.lookup(550).await, None);
}

/// 可用性查询成功返回数据，上游出错返回 None
#[tokio::test]
async fn test_availability_lookup() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/"))
        .and(query_param("apiKey", "wm"))
        .and(query_param("search_field", "tmdb_id"))
        .and(query_param("search_value", "550"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"title_results": [{"id": 1}]})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search/"))
        .and(query_param("search_value", "13"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = AvailabilityClient::new(&AvailabilityConfig {
        base_url: server.uri(),
        api_key: Some("wm".to_string()),
        ..Default::default()
    })
    .unwrap();

    let body = client.lookup(550).await.unwrap();
    assert_eq!(body["title_results"][0]["id"], 1);
    // 第二次命中缓存
    assert!(client.lookup(550).await.is_some());

    assert_eq!(client.lookup(13).await, None);
}

/// 不同搜索词产生的缓存条目过期后会被清理
#[tokio::test]
async fn test_expired_search_entries_are_swept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/multi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .expect(50)
        .mount(&server)
        .await;

    let client = CatalogClient::new(&catalog_config(&server)).unwrap();
    for i in 0..50 {
        client.search_titles(&format!("query {}", i), 1).await.unwrap();
    }
    assert_eq!(client.cache().len(), 50);

    // 搜索结果缓存 120 秒
    let now = tokio::time::Instant::now();
    assert_eq!(client.cache().sweep_at(now + Duration::from_secs(60)), 0);
    assert_eq!(client.cache().sweep_at(now + Duration::from_secs(121)), 50);
    assert!(client.cache().is_empty());
}

/// 可用性查询缓存同样可以清理
#[tokio::test]
async fn test_expired_availability_entries_are_swept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"title_results": []})))
        .mount(&server)
        .await;

    let client = AvailabilityClient::new(&AvailabilityConfig {
        base_url: server.uri(),
        api_key: Some("wm".to_string()),
        revalidate_secs: 10,
        ..Default::default()
    })
    .unwrap();

    for id in 1..=5 {
        client.lookup(id).await.unwrap();
    }
    assert_eq!(client.cache().len(), 5);

    let later = tokio::time::Instant::now() + Duration::from_secs(11);
    assert_eq!(client.cache().sweep_at(later), 5);
    assert!(client.cache().is_empty());
}
