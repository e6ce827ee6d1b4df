// 子模块定义
mod catalog;
mod comments;
mod contact;
mod messages;
mod state;
mod utils;
mod web;

// 公共 API 重新导出
pub use state::AppState;
pub use utils::create_tcp_listener;
pub use web::{build_router, WebServer};
