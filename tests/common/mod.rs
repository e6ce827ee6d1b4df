#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use cinevault::{
    config::{Config, FetchPolicyConfig},
    server::{build_router, AppState},
};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

/// 测试环境：应用上下文与临时数据库目录（需与状态同生命周期）
pub struct TestApp {
    pub state: Arc<AppState>,
    pub router: Router,
    _dir: TempDir,
}

/// 创建指向模拟目录服务的测试配置
pub fn test_config(catalog_uri: &str, dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.catalog.base_url = catalog_uri.to_string();
    config.catalog.bearer_token = Some("test-token".to_string());
    config.catalog.listing = FetchPolicyConfig {
        timeout_ms: 300,
        retries: 0,
        backoff_ms: 0,
    };
    config.catalog.detail = FetchPolicyConfig {
        timeout_ms: 300,
        retries: 1,
        backoff_ms: 10,
    };
    // 可用性查询指向一个不存在的地址，未配置密钥时不会访问
    config.availability.base_url = catalog_uri.to_string();
    config.contact.database_path = dir
        .path()
        .join("contact.db")
        .to_string_lossy()
        .into_owned();
    config
}

pub fn test_app_with(config_fn: impl FnOnce(&mut Config), catalog_uri: &str) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(catalog_uri, &dir);
    config_fn(&mut config);

    let state = Arc::new(AppState::new(&config).unwrap());
    let router = build_router(state.clone());
    TestApp {
        state,
        router,
        _dir: dir,
    }
}

pub fn test_app(catalog_uri: &str) -> TestApp {
    test_app_with(|_| {}, catalog_uri)
}

/// 发送请求并解析 JSON 响应
pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    };
    (status, json)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}
