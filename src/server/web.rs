use crate::{config::WebConfig, error::AppError};
use axum::{
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio_graceful_shutdown::{IntoSubsystem, SubsystemHandle};
use tower_http::timeout::TimeoutLayer;
use tracing::{error, info};

use super::{
    catalog::{discover_handler, home_handler, search_handler, title_handler},
    comments::{create_comment_handler, list_comments_handler},
    contact::contact_handler,
    messages::messages_handler,
    state::AppState,
    utils::create_tcp_listener,
};

/// 创建 Web 服务路由
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/home", get(home_handler))
        .route("/api/search", get(search_handler))
        .route("/api/discover", get(discover_handler))
        .route("/api/title/{media}/{id}", get(title_handler))
        .route("/api/contact", post(contact_handler))
        .route(
            "/api/comments",
            get(list_comments_handler).post(create_comment_handler),
        )
        .route("/api/admin/messages", get(messages_handler))
        .with_state(state)
}

// Web 服务
pub struct WebServer {
    // 监听地址
    addr: SocketAddr,
    // 请求处理超时
    timeout: Duration,
    // 应用上下文
    state: Arc<AppState>,
}

impl WebServer {
    pub fn new(config: &WebConfig, state: Arc<AppState>) -> Result<Self, AppError> {
        // 解析监听地址
        let addr = format!("{}:{}", config.address, config.port)
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid listening address: {:?}", e)))?;

        Ok(Self {
            addr,
            timeout: Duration::from_secs(config.timeout.request),
            state,
        })
    }

    // 获取服务器监听地址
    #[inline(always)]
    pub fn get_addr(&self) -> &SocketAddr {
        &self.addr
    }
}

#[async_trait::async_trait]
impl IntoSubsystem<AppError> for WebServer {
    async fn run(self, subsys: SubsystemHandle) -> Result<(), AppError> {
        let app = build_router(self.state.clone()).layer(TimeoutLayer::new(self.timeout));

        // 创建 TCP 监听器
        let listener = create_tcp_listener(self.addr, u16::MAX.into())?;
        info!("Web service listening on {:?}", self.addr);

        // 使用tokio::select!监听服务器和关闭信号
        tokio::select! {
            result = axum::serve(listener, app) => {
                if let Err(e) = result {
                    error!("Web service error: {}", e);
                } else {
                    info!("Web service completed normally");
                }
                Ok(())
            }
            _ = subsys.on_shutdown_requested() => {
                info!("Shutdown requested, stopping web service");
                Ok(())
            }
        }
    }
}
