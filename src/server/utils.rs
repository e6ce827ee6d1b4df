use crate::{
    error::AppError,
    r#const::{http_headers, rate_limit_limits},
};
use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// 客户端地址：X-Forwarded-For 的第一个条目
#[inline]
pub(super) fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get(http_headers::FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// 限流键，无法识别客户端时所有请求共享 "unknown"
#[inline]
pub(super) fn client_key(ip: Option<&str>) -> &str {
    ip.unwrap_or(rate_limit_limits::UNKNOWN_KEY)
}

#[inline]
pub(super) fn user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// 请求体是否声明为 JSON（忽略 charset 等参数）
#[inline]
pub(super) fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|v| v.trim().eq_ignore_ascii_case(http_headers::JSON_CONTENT_TYPE))
}

/// `{ok:false, error}` 形式的错误响应
pub(super) fn json_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "ok": false, "error": message }))).into_response()
}

/// 创建 TCP 监听器
/// 根据提供的地址和监听队列大小创建一个非阻塞的 TCP 监听器。
pub fn create_tcp_listener(addr: SocketAddr, backlog: i32) -> Result<TcpListener, AppError> {
    let domain = if addr.is_ipv6() {
        Domain::IPV6
    } else {
        Domain::IPV4
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    // 设置 SO_REUSEADDR 选项 (所有平台)
    socket.set_reuse_address(true)?;

    // 在 Linux 平台上设置 SO_REUSEPORT 选项
    #[cfg(target_os = "linux")]
    socket.set_reuse_port(true)?;

    socket.bind(&addr.into())?;
    socket.listen(backlog)?;
    socket.set_nonblocking(true)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener).map_err(AppError::Io)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_client_ip_takes_first_forwarded_entry() {
        let mut headers = HeaderMap::new();
        assert_eq!(client_ip(&headers), None);
        assert_eq!(client_key(client_ip(&headers).as_deref()), "unknown");

        headers.insert(
            http_headers::FORWARDED_FOR,
            HeaderValue::from_static(" 1.2.3.4 , 10.0.0.1"),
        );
        assert_eq!(client_ip(&headers).as_deref(), Some("1.2.3.4"));

        headers.insert(http_headers::FORWARDED_FOR, HeaderValue::from_static(" "));
        assert_eq!(client_ip(&headers), None);
    }

    #[test]
    fn test_is_json_ignores_parameters() {
        let mut headers = HeaderMap::new();
        assert!(!is_json(&headers));

        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        assert!(is_json(&headers));

        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        assert!(!is_json(&headers));
    }

    #[tokio::test]
    async fn test_listener_binds_with_reuse_options() {
        let listener = create_tcp_listener("127.0.0.1:0".parse().unwrap(), 128).unwrap();
        let addr = listener.local_addr().unwrap();
        assert_ne!(addr.port(), 0);

        // SO_REUSEPORT 允许第二个监听器绑定同一端口
        #[cfg(target_os = "linux")]
        {
            let second = create_tcp_listener(addr, 128).unwrap();
            assert_eq!(second.local_addr().unwrap(), addr);
        }
    }
}
