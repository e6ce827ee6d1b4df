use crate::{
    contact::{ContactSubmission, Screening},
    metrics::METRICS,
    r#const::contact_labels,
};
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::{
    state::AppState,
    utils::{client_ip, client_key, is_json, json_error, user_agent},
};

// 记录提交结果
#[inline(always)]
fn record(outcome: &str) {
    METRICS
        .contact_submissions_total()
        .with_label_values(&[outcome])
        .inc();
}

/// 联系表单提交
///
/// 顺序：内容类型、限流、解析、蜜罐、字段校验、时间戳陷阱、写入
pub async fn contact_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    METRICS.http_requests_total().with_label_values(&["contact"]).inc();

    if !is_json(&headers) {
        record(contact_labels::INVALID);
        return json_error(StatusCode::BAD_REQUEST, "Invalid content type");
    }

    // 限流在解析请求体之前执行，被拒绝的请求没有任何副作用
    let ip = client_ip(&headers);
    let admission = state.limiter.admit(client_key(ip.as_deref()));
    if !admission.allowed {
        METRICS.ratelimit_total().with_label_values(&["contact"]).inc();
        record(contact_labels::THROTTLED);
        return json_error(
            StatusCode::TOO_MANY_REQUESTS,
            "Too many requests, please wait a moment.",
        );
    }

    let submission: ContactSubmission = match serde_json::from_slice(&body) {
        Ok(submission) => submission,
        Err(e) => {
            debug!("Malformed contact payload: {}", e);
            record(contact_labels::INVALID);
            return json_error(StatusCode::BAD_REQUEST, "Invalid JSON.");
        }
    };

    let message = match submission.screen(&state.contact_rules, Utc::now().timestamp_millis()) {
        Ok(Screening::Accepted(message)) => message,
        Ok(Screening::Honeypot) => {
            info!("Contact honeypot triggered, dropping submission");
            record(contact_labels::HONEYPOT);
            return Json(json!({ "ok": true, "saved": false, "note": "honeypot" }))
                .into_response();
        }
        Err(rejection) => {
            let label = match rejection.field {
                Some(_) => contact_labels::INVALID,
                None => contact_labels::TOO_FAST,
            };
            record(label);

            let body = match rejection.field {
                Some(field) => json!({ "ok": false, "field": field, "error": rejection.message }),
                None => json!({ "ok": false, "error": rejection.message }),
            };
            return (StatusCode::BAD_REQUEST, Json(body)).into_response();
        }
    };

    let store = state.contacts.clone();
    let ua = user_agent(&headers);
    let saved = tokio::task::spawn_blocking(move || {
        store.insert(&message, ip.as_deref(), ua.as_deref())
    })
    .await;

    match saved {
        Ok(Ok(id)) => {
            info!("Contact message {} saved", id);
            record(contact_labels::SAVED);
            Json(json!({ "ok": true, "saved": true, "remaining": admission.remaining }))
                .into_response()
        }
        // 写入失败仍然返回成功，只是 saved 为 false
        Ok(Err(e)) => {
            warn!("Contact message save failed: {}", e);
            record(contact_labels::SAVE_FAILED);
            let mut body = json!({ "ok": true, "saved": false, "remaining": admission.remaining });
            if state.expose_errors {
                body["dbError"] = json!(e.to_string());
            }
            Json(body).into_response()
        }
        Err(e) => {
            error!("Contact save task failed: {}", e);
            record(contact_labels::SAVE_FAILED);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Server error.")
        }
    }
}
