use crate::config::defaults::{default_database_path, default_max_message, default_min_fill_ms};
use serde::{Deserialize, Serialize};
use validator::Validate;

// 联系表单配置
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactConfig {
    // SQLite 数据库路径
    #[serde(default = "default_database_path")]
    #[validate(length(min = 1, message = "Database path cannot be empty"))]
    pub database_path: String,
    // 表单加载到提交的最短时间（毫秒），低于此值视为机器人
    #[serde(default = "default_min_fill_ms")]
    pub min_fill_ms: u64,
    // 留言最大长度（字符）
    #[serde(default = "default_max_message")]
    #[validate(range(min = 1))]
    pub max_message: usize,
    // 是否在响应中暴露内部错误（仅限非生产环境）
    #[serde(default)]
    pub expose_errors: bool,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            min_fill_ms: default_min_fill_ms(),
            max_message: default_max_message(),
            expose_errors: false,
        }
    }
}

// 管理端访问配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AdminAccessConfig {
    // 静态共享密钥，为空时管理接口不可用
    #[serde(default)]
    pub key: Option<String>,
}
