use crate::{
    contact::{parse_movie_id, Comment, CommentSubmission},
    metrics::METRICS,
    r#const::comment_limits,
};
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, error};

use super::{
    state::AppState,
    utils::{client_ip, client_key, json_error},
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentsQuery {
    pub movie_id: Option<String>,
}

/// 某部影片的最新评论，影片 id 无效时返回空列表
pub async fn list_comments_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CommentsQuery>,
) -> Response {
    METRICS.http_requests_total().with_label_values(&["comments"]).inc();

    let Some(movie_id) = query
        .movie_id
        .map(Value::String)
        .as_ref()
        .and_then(parse_movie_id)
    else {
        return Json(json!({ "ok": true, "items": Vec::<Comment>::new() })).into_response();
    };

    let store = state.contacts.clone();
    let result = tokio::task::spawn_blocking(move || {
        store.comments_for(movie_id, comment_limits::PAGE_SIZE)
    })
    .await;

    let failure = match result {
        Ok(Ok(items)) => return Json(json!({ "ok": true, "items": items })).into_response(),
        Ok(Err(e)) => e.to_string(),
        Err(e) => e.to_string(),
    };

    error!("Failed to list comments for movie {}: {}", movie_id, failure);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "ok": false, "items": Vec::<Comment>::new(), "error": "server-error" })),
    )
        .into_response()
}

/// 发表评论，按客户端地址限流
pub async fn create_comment_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    METRICS.http_requests_total().with_label_values(&["comments"]).inc();

    let ip = client_ip(&headers);
    let key = format!(
        "{}{}",
        comment_limits::RATE_LIMIT_PREFIX,
        client_key(ip.as_deref())
    );
    if !state.limiter.admit(&key).allowed {
        METRICS.ratelimit_total().with_label_values(&["comments"]).inc();
        return json_error(StatusCode::TOO_MANY_REQUESTS, "rate-limited");
    }

    let submission: CommentSubmission = match serde_json::from_slice(&body) {
        Ok(submission) => submission,
        Err(e) => {
            debug!("Malformed comment payload: {}", e);
            return json_error(StatusCode::BAD_REQUEST, "invalid-json");
        }
    };

    let Some(comment) = submission.normalize() else {
        return json_error(StatusCode::BAD_REQUEST, "missing-fields");
    };

    let store = state.contacts.clone();
    let result = tokio::task::spawn_blocking(move || store.insert_comment(&comment)).await;

    let failure = match result {
        Ok(Ok(item)) => {
            return (StatusCode::CREATED, Json(json!({ "ok": true, "item": item }))).into_response()
        }
        Ok(Err(e)) => e.to_string(),
        Err(e) => e.to_string(),
    };

    error!("Failed to save comment: {}", failure);
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "server-error")
}
