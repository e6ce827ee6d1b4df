mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use cinevault::contact::ContactMessage;
use common::{get, send, test_app, test_app_with};
use serde_json::json;
use std::time::Duration;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

/// 首页：流行栏目超时降级为空，其余栏目正常返回
#[tokio::test]
async fn test_home_degrades_slow_shelf() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/trending/movie/day"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"id": 550, "title": "Fight Club", "release_date": "1999-10-15", "poster_path": "/p.jpg"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/movie/popular"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"results": [{"id": 1}]}))
                .set_delay(Duration::from_secs(2)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/genre/movie/list"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let app = test_app(&server.uri());
    let (status, body) = send(&app.router, get("/api/home")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["popular"], json!([]));
    assert_eq!(body["genres"], json!([]));
    assert_eq!(body["trending"][0]["title"], "Fight Club");
    assert_eq!(body["trending"][0]["year"], "1999");
    assert_eq!(
        body["trending"][0]["poster"],
        "https://image.tmdb.org/t/p/w500/p.jpg"
    );
}

/// 空关键字不请求上游
#[tokio::test]
async fn test_search_empty_query_skips_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let app = test_app(&server.uri());
    let (status, body) = send(&app.router, get("/api/search?q=%20%20")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"results": []}));
}

/// 搜索结果按条目类型归一化
#[tokio::test]
async fn test_search_normalizes_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/multi"))
        .and(query_param("query", "thrones"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"id": 1399, "name": "Game of Thrones", "media_type": "tv", "first_air_date": "2011-04-17"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = test_app(&server.uri());
    let (_, body) = send(&app.router, get("/api/search?q=thrones&page=2")).await;

    assert_eq!(
        body["results"][0],
        json!({
            "id": 1399,
            "media": "tv",
            "title": "Game of Thrones",
            "poster": null,
            "backdrop": null,
            "year": "2011"
        })
    );
}

/// 发现页把筛选条件转换为上游查询参数
#[tokio::test]
async fn test_discover_passes_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/discover/movie"))
        .and(query_param("primary_release_year", "1999"))
        .and(query_param("with_genres", "28"))
        .and(query_param("sort_by", "popularity.desc"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"results": [{"id": 603, "title": "The Matrix"}]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let app = test_app(&server.uri());
    let (status, body) =
        send(&app.router, get("/api/discover?year=1999&genre=28")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"][0]["title"], "The Matrix");
}

/// 详情请求失败返回 503，内部错误不外泄
#[tokio::test]
async fn test_title_unavailable_on_critical_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movie/550"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/movie/550/watch/providers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": {}})))
        .mount(&server)
        .await;

    let app = test_app(&server.uri());
    let (status, body) = send(&app.router, get("/api/title/movie/550")).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, json!({"ok": false, "error": "Content unavailable."}));
}

/// 详情成功时观看渠道失败可以降级
#[tokio::test]
async fn test_title_with_degraded_providers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tv/1399"))
        .and(query_param("language", "en-US"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": 1399, "name": "Game of Thrones"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tv/1399/watch/providers"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let app = test_app(&server.uri());
    let (status, body) = send(&app.router, get("/api/title/tv/1399")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"]["name"], "Game of Thrones");
    assert_eq!(body["providers"], json!({"results": []}));
    assert_eq!(body["availability"], json!(null));
}

/// 未知媒体类型返回 404
#[tokio::test]
async fn test_title_unknown_media_type() {
    let server = MockServer::start().await;
    let app = test_app(&server.uri());
    let (status, _) = send(&app.router, get("/api/title/person/1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// 管理端留言列表需要正确的密钥
#[tokio::test]
async fn test_admin_messages_require_key() {
    let server = MockServer::start().await;
    let app = test_app_with(|c| c.admin.key = Some("s3cret".to_string()), &server.uri());

    let (status, _) = send(&app.router, get("/api/admin/messages")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app.router, get("/api/admin/messages?key=wrong")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app.router, get("/api/admin/messages?key=s3cret")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);

    let request = Request::get("/api/admin/messages")
        .header("x-admin-key", "s3cret")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["messages"], json!([]));
}

/// 未配置管理端密钥时接口不存在
#[tokio::test]
async fn test_admin_messages_disabled_without_key() {
    let server = MockServer::start().await;
    let app = test_app(&server.uri());

    let (status, _) = send(&app.router, get("/api/admin/messages?key=anything")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

fn post_json(uri: &str, payload: serde_json::Value, ip: &str) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .header("x-forwarded-for", ip)
        .body(Body::from(payload.to_string()))
        .unwrap()
}

fn seed_messages(app: &common::TestApp, subjects: &[&str]) -> Vec<i64> {
    subjects
        .iter()
        .map(|subject| {
            let message = ContactMessage {
                name: "Ada".into(),
                email: "ada@example.com".into(),
                subject: subject.to_string(),
                message: "hello".into(),
                phone: None,
            };
            app.state.contacts.insert(&message, None, None).unwrap()
        })
        .collect()
}

fn ids(body: &serde_json::Value) -> Vec<i64> {
    body["messages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_i64().unwrap())
        .collect()
}

/// 评论：发表后按影片列出，昵称缺省为 Guest
#[tokio::test]
async fn test_comments_post_and_list() {
    let server = MockServer::start().await;
    let app = test_app(&server.uri());

    let (status, body) = send(
        &app.router,
        post_json(
            "/api/comments",
            json!({"movieId": "550", "name": "  ", "body": "  First rule.  "}),
            "10.0.0.1",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["ok"], true);
    assert_eq!(body["item"]["movieId"], 550);
    assert_eq!(body["item"]["name"], "Guest");
    assert_eq!(body["item"]["body"], "First rule.");

    let (status, _) = send(
        &app.router,
        post_json(
            "/api/comments",
            json!({"movieId": 550, "name": "Tyler", "body": "Second rule."}),
            "10.0.0.2",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app.router, get("/api/comments?movieId=550")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["items"][0]["name"], "Tyler");
    assert_eq!(body["items"][1]["body"], "First rule.");

    let (_, body) = send(&app.router, get("/api/comments?movieId=13")).await;
    assert_eq!(body, json!({"ok": true, "items": []}));
}

/// 评论：影片 id 无效时返回空列表
#[tokio::test]
async fn test_comments_invalid_movie_id_lists_nothing() {
    let server = MockServer::start().await;
    let app = test_app(&server.uri());

    for uri in [
        "/api/comments",
        "/api/comments?movieId=abc",
        "/api/comments?movieId=0",
        "/api/comments?movieId=-4",
    ] {
        let (status, body) = send(&app.router, get(uri)).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(body, json!({"ok": true, "items": []}), "{uri}");
    }
}

/// 评论：缺少正文或影片 id 时拒绝，正文与昵称按长度截断
#[tokio::test]
async fn test_comments_validation_and_truncation() {
    let server = MockServer::start().await;
    let app = test_app_with(|c| c.rate_limit.max_tokens = 20, &server.uri());

    for payload in [
        json!({"movieId": 550, "body": "   "}),
        json!({"movieId": "x", "body": "hi"}),
        json!({"body": "hi"}),
    ] {
        let (status, body) = send(&app.router, post_json("/api/comments", payload, "10.0.0.3")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"ok": false, "error": "missing-fields"}));
    }

    let (status, body) = send(
        &app.router,
        post_json(
            "/api/comments",
            json!({"movieId": 550, "name": "n".repeat(80), "body": "b".repeat(900)}),
            "10.0.0.3",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["item"]["name"].as_str().unwrap().len(), 40);
    assert_eq!(body["item"]["body"].as_str().unwrap().len(), 600);
}

/// 评论提交按客户端限流，且与联系表单分开计数
#[tokio::test]
async fn test_comments_are_rate_limited() {
    let server = MockServer::start().await;
    let app = test_app_with(|c| c.rate_limit.max_tokens = 1, &server.uri());
    let payload = json!({"movieId": 550, "body": "again"});

    let (status, _) = send(&app.router, post_json("/api/comments", payload.clone(), "10.0.0.9")).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app.router, post_json("/api/comments", payload.clone(), "10.0.0.9")).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body, json!({"ok": false, "error": "rate-limited"}));

    // 其他客户端不受影响
    let (status, _) = send(&app.router, post_json("/api/comments", payload, "10.0.0.10")).await;
    assert_eq!(status, StatusCode::CREATED);

    // 同一地址的联系表单令牌桶仍然是满的
    let admission = app.state.limiter.admit("10.0.0.9");
    assert!(admission.allowed);
}

/// 管理端搜索不区分大小写，覆盖姓名、邮箱、主题、正文与电话
#[tokio::test]
async fn test_admin_messages_search() {
    let server = MockServer::start().await;
    let app = test_app_with(|c| c.admin.key = Some("s3cret".to_string()), &server.uri());
    seed_messages(&app, &["Billing question", "Hello", "Refund please"]);
    let phone = ContactMessage {
        name: "Grace".into(),
        email: "grace@example.org".into(),
        subject: "Call me".into(),
        message: "thanks".into(),
        phone: Some("+27 555 0100".into()),
    };
    app.state.contacts.insert(&phone, None, None).unwrap();

    let (status, body) = send(&app.router, get("/api/admin/messages?key=s3cret&q=REFUND")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["messages"].as_array().unwrap().len(), 1);
    assert_eq!(body["messages"][0]["subject"], "Refund please");
    assert_eq!(body["total"], 4);

    let (_, body) = send(&app.router, get("/api/admin/messages?key=s3cret&q=0100")).await;
    assert_eq!(body["messages"][0]["name"], "Grace");

    let (_, body) = send(&app.router, get("/api/admin/messages?key=s3cret&q=example.com")).await;
    assert_eq!(body["messages"].as_array().unwrap().len(), 3);

    let (_, body) = send(&app.router, get("/api/admin/messages?key=s3cret&q=nobody")).await;
    assert_eq!(body["messages"], json!([]));
    assert_eq!(body["prevCursor"], serde_json::Value::Null);
    assert_eq!(body["nextCursor"], serde_json::Value::Null);
}

/// 管理端按 id 游标翻页，每页 20 条
#[tokio::test]
async fn test_admin_messages_cursor_pagination() {
    let server = MockServer::start().await;
    let app = test_app_with(|c| c.admin.key = Some("s3cret".to_string()), &server.uri());
    let subjects: Vec<String> = (0..45).map(|i| format!("subject {i}")).collect();
    let subjects: Vec<&str> = subjects.iter().map(String::as_str).collect();
    let seeded = seed_messages(&app, &subjects);

    let (status, first) = send(&app.router, get("/api/admin/messages?key=s3cret")).await;
    assert_eq!(status, StatusCode::OK);
    let first_ids = ids(&first);
    assert_eq!(first_ids.len(), 20);
    assert_eq!(first_ids[0], seeded[44]);
    assert!(first_ids.windows(2).all(|w| w[0] > w[1]));
    assert_eq!(first["prevCursor"], seeded[44]);
    assert_eq!(first["nextCursor"], seeded[25]);

    let uri = format!("/api/admin/messages?key=s3cret&cursor={}&dir=next", seeded[25]);
    let (_, second) = send(&app.router, get(&uri)).await;
    assert_eq!(ids(&second), seeded[5..25].iter().rev().copied().collect::<Vec<_>>());

    let uri = format!(
        "/api/admin/messages?key=s3cret&cursor={}",
        second["nextCursor"].as_i64().unwrap()
    );
    let (_, last) = send(&app.router, get(&uri)).await;
    assert_eq!(ids(&last), seeded[..5].iter().rev().copied().collect::<Vec<_>>());

    // 从第二页向前翻回到第一页
    let uri = format!(
        "/api/admin/messages?key=s3cret&cursor={}&dir=prev",
        second["prevCursor"].as_i64().unwrap()
    );
    let (_, back) = send(&app.router, get(&uri)).await;
    assert_eq!(ids(&back), first_ids);
}
