use std::io;
use thiserror::Error;

/// 应用错误类型
#[derive(Error, Debug)]
pub enum AppError {
    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// 配置错误（缺少凭据、配置非法等），不会重试
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP客户端错误
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// 上游错误：返回了错误状态码，或重试后仍不可达（status 为 None）
    #[error("Upstream error on {path}: {reason}")]
    Upstream {
        path: String,
        status: Option<u16>,
        reason: String,
    },

    /// 序列化/反序列化错误
    #[error("Serialization/deserialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    /// 数据库错误
    #[error("Database error: {0}")]
    Database(String),

    /// 请求验证错误
    #[error("Request validation error: {0}")]
    ValidationError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// 上游错误携带的状态码
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            AppError::Upstream { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(error: rusqlite::Error) -> Self {
        AppError::Database(error.to_string())
    }
}

impl From<r2d2::Error> for AppError {
    fn from(error: r2d2::Error) -> Self {
        AppError::Database(format!("Connection pool error: {}", error))
    }
}
