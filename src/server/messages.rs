use crate::{
    contact::{MessageQuery, PageDirection},
    metrics::METRICS,
    r#const::{contact_limits, http_headers},
};
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tracing::{error, warn};

use super::{state::AppState, utils::json_error};

/// 管理端查询参数
#[derive(Debug, Default, Deserialize)]
pub struct AdminQuery {
    pub key: Option<String>,
    // 关键字
    pub q: Option<String>,
    // 游标，即上一页首条或末条留言的 id
    pub cursor: Option<String>,
    // next | prev
    pub dir: Option<String>,
}

impl AdminQuery {
    fn to_message_query(&self) -> MessageQuery {
        // 非正整数游标视为从头开始
        let cursor = self
            .cursor
            .as_deref()
            .and_then(|c| c.trim().parse::<i64>().ok())
            .filter(|c| *c > 0);
        let direction = match self.dir.as_deref() {
            Some("prev") => PageDirection::Prev,
            _ => PageDirection::Next,
        };

        MessageQuery {
            q: self.q.clone(),
            cursor,
            direction,
            limit: contact_limits::MESSAGES_PAGE_SIZE,
        }
    }
}

// 常量时间比较，长度不同直接失败
fn key_matches(provided: &str, expected: &str) -> bool {
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}

/// 管理端留言列表，需要 X-Admin-Key 头或 ?key= 参数
///
/// 支持 `q` 关键字搜索与 `cursor`/`dir` 游标翻页
pub async fn messages_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<AdminQuery>,
) -> Response {
    METRICS.http_requests_total().with_label_values(&["messages"]).inc();

    let Some(expected) = state.admin_key.as_deref() else {
        return json_error(StatusCode::NOT_FOUND, "Not found.");
    };

    let provided = headers
        .get(http_headers::ADMIN_KEY)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| query.key.clone())
        .unwrap_or_default();

    if !key_matches(provided.trim(), expected) {
        warn!("Rejected admin request with invalid key");
        return json_error(StatusCode::UNAUTHORIZED, "Unauthorized.");
    }

    let page = query.to_message_query();
    let store = state.contacts.clone();
    let result = tokio::task::spawn_blocking(move || {
        let total = store.count()?;
        let messages = store.search(&page)?;
        Ok::<_, crate::error::AppError>((total, messages))
    })
    .await;

    match result {
        Ok(Ok((total, messages))) => {
            let prev_cursor = messages.first().map(|m| m.id);
            let next_cursor = messages.last().map(|m| m.id);
            Json(json!({
                "ok": true,
                "total": total,
                "messages": messages,
                "prevCursor": prev_cursor,
                "nextCursor": next_cursor,
            }))
            .into_response()
        }
        Ok(Err(e)) => {
            error!("Failed to list contact messages: {}", e);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Server error.")
        }
        Err(e) => {
            error!("Message listing task failed: {}", e);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Server error.")
        }
    }
}
