// 应用常量定义

//
// 配置参数限制常量
//

// 应用关闭等待时间限制
pub mod shutdown_timeout {
    // 默认值
    pub const DEFAULT: u64 = 30;
    // 最小值
    pub const MIN: u64 = 1;
    // 最大值
    pub const MAX: u64 = 120;
}

// Web 服务配置限制
pub mod http_server_limits {
    // 默认 Web 服务端口
    pub const DEFAULT_WEB_PORT: u16 = 3000;
    // 默认管理服务端口
    pub const DEFAULT_ADMIN_PORT: u16 = 9000;
    // 默认请求处理超时（秒）
    pub const DEFAULT_REQUEST_TIMEOUT: u64 = 30;
    // 最小请求处理超时（秒）
    pub const MIN_REQUEST_TIMEOUT: u64 = 1;
    // 最大请求处理超时（秒）
    pub const MAX_REQUEST_TIMEOUT: u64 = 300;
}

// 目录 API 客户端配置限制
pub mod catalog_limits {
    // 默认目录 API 地址
    pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
    // 默认用户代理
    pub const DEFAULT_USER_AGENT: &str = "CineVault/1.0";
    // 默认连接超时（秒）
    pub const DEFAULT_CONNECT_TIMEOUT: u64 = 10;
    // 最小连接超时（秒）
    pub const MIN_CONNECT_TIMEOUT: u64 = 1;
    // 最大连接超时（秒）
    pub const MAX_CONNECT_TIMEOUT: u64 = 120;
    // 列表请求默认超时（毫秒），首页必须快速失败
    pub const DEFAULT_LISTING_TIMEOUT_MS: u64 = 4000;
    // 详情请求默认超时（毫秒）
    pub const DEFAULT_DETAIL_TIMEOUT_MS: u64 = 15000;
    // 最小请求超时（毫秒）
    pub const MIN_TIMEOUT_MS: u64 = 50;
    // 最大请求超时（毫秒）
    pub const MAX_TIMEOUT_MS: u64 = 120_000;
    // 列表请求默认重试次数
    pub const DEFAULT_LISTING_RETRIES: u32 = 0;
    // 详情请求默认重试次数
    pub const DEFAULT_DETAIL_RETRIES: u32 = 1;
    // 最大重试次数
    pub const MAX_RETRIES: u32 = 10;
    // 默认退避步长（毫秒）
    pub const DEFAULT_BACKOFF_MS: u64 = 300;
    // 最大退避步长（毫秒）
    pub const MAX_BACKOFF_MS: u64 = 10_000;
    // 默认缓存清理间隔（秒）
    pub const DEFAULT_CACHE_SWEEP_INTERVAL: u64 = 60;
    // 最小缓存清理间隔（秒）
    pub const MIN_CACHE_SWEEP_INTERVAL: u64 = 1;
    // 最大缓存清理间隔（秒）
    pub const MAX_CACHE_SWEEP_INTERVAL: u64 = 3600;
    // 查询参数形式的 API 密钥名称
    pub const API_KEY_PARAM: &str = "api_key";
}

// 可用性查询 API 配置限制
pub mod availability_limits {
    // 默认可用性 API 地址
    pub const DEFAULT_BASE_URL: &str = "https://api.watchmode.com/v1";
    // 默认请求超时（毫秒）
    pub const DEFAULT_TIMEOUT_MS: u64 = 5000;
    // 默认缓存时间（秒）
    pub const DEFAULT_REVALIDATE_SECS: u64 = 3600;
}

// 限流配置限制
pub mod rate_limit_limits {
    // 默认令牌桶容量
    pub const DEFAULT_MAX_TOKENS: u32 = 5;
    // 最小令牌桶容量
    pub const MIN_MAX_TOKENS: u32 = 1;
    // 最大令牌桶容量
    pub const MAX_MAX_TOKENS: u32 = 10_000;
    // 默认补满窗口（毫秒）
    pub const DEFAULT_WINDOW_MS: u64 = 60_000;
    // 最小补满窗口（毫秒）
    pub const MIN_WINDOW_MS: u64 = 1_000;
    // 最大补满窗口（毫秒）
    pub const MAX_WINDOW_MS: u64 = 86_400_000;
    // 空闲多少个窗口后清理令牌桶
    pub const DEFAULT_IDLE_SWEEP_WINDOWS: u32 = 10;
    // 默认清理间隔（秒）
    pub const DEFAULT_SWEEP_INTERVAL: u64 = 60;
    // 最小清理间隔（秒）
    pub const MIN_SWEEP_INTERVAL: u64 = 1;
    // 最大清理间隔（秒）
    pub const MAX_SWEEP_INTERVAL: u64 = 3600;
    // 无法识别客户端时使用的键
    pub const UNKNOWN_KEY: &str = "unknown";
}

// 联系表单限制
pub mod contact_limits {
    // 默认数据库路径
    pub const DEFAULT_DATABASE_PATH: &str = "cinevault.db";
    // 表单最短填写时间（毫秒）
    pub const DEFAULT_MIN_FILL_MS: u64 = 1200;
    // 留言最大长度（字符）
    pub const DEFAULT_MAX_MESSAGE: usize = 1000;
    // 邮箱最小长度
    pub const EMAIL_MIN_LEN: usize = 3;
    // 邮箱最大长度
    pub const EMAIL_MAX_LEN: usize = 254;
    // 管理端每页留言数
    pub const MESSAGES_PAGE_SIZE: usize = 20;
}

// 影片评论限制
pub mod comment_limits {
    // 未填写昵称时的默认值
    pub const DEFAULT_NAME: &str = "Guest";
    // 昵称最大长度（字符）
    pub const NAME_MAX_CHARS: usize = 40;
    // 评论正文最大长度（字符）
    pub const BODY_MAX_CHARS: usize = 600;
    // 每部影片返回的最新评论数
    pub const PAGE_SIZE: usize = 100;
    // 评论提交的限流键前缀，与联系表单分开计数
    pub const RATE_LIMIT_PREFIX: &str = "comments:";
}

// 环境变量名称
pub mod env_keys {
    // Bearer 令牌候选变量（按优先级排列）
    pub const CATALOG_BEARER: [&str; 3] = ["TMDB_BEARER", "TMDB_TOKEN", "NEXT_PUBLIC_TMDB_TOKEN"];
    // API 密钥
    pub const CATALOG_API_KEY: &str = "TMDB_API_KEY";
    // 详情请求超时覆盖
    pub const CATALOG_TIMEOUT_MS: &str = "TMDB_TIMEOUT_MS";
    // 详情请求重试次数覆盖
    pub const CATALOG_RETRIES: &str = "TMDB_RETRIES";
    // 可用性 API 密钥
    pub const AVAILABILITY_API_KEY: &str = "WATCHMODE_API_KEY";
    // 管理端共享密钥
    pub const ADMIN_KEY: &str = "ADMIN_KEY";
    // 数据库路径
    pub const DATABASE_PATH: &str = "DATABASE_PATH";
}

// HTTP 头部常量
pub mod http_headers {
    // 转发客户端地址头部
    pub const FORWARDED_FOR: &str = "x-forwarded-for";
    // 管理端密钥头部
    pub const ADMIN_KEY: &str = "x-admin-key";
    // JSON 内容类型
    pub const JSON_CONTENT_TYPE: &str = "application/json";
}

// 图片 CDN 地址
pub mod image_cdn {
    // 海报
    pub const POSTER_BASE: &str = "https://image.tmdb.org/t/p/w500";
    // 背景图
    pub const BACKDROP_BASE: &str = "https://image.tmdb.org/t/p/original";
}

//
// 指标标签常量
//

// 错误类型标签
pub mod error_labels {
    // 上游返回错误状态码
    pub const STATUS_ERROR: &str = "status_error";
    // 网络错误（超时、连接失败等）
    pub const NETWORK_ERROR: &str = "network_error";
    // 响应体解析错误
    pub const DECODE_ERROR: &str = "decode_error";
}

// 联系表单处理结果标签
pub mod contact_labels {
    pub const SAVED: &str = "saved";
    pub const SAVE_FAILED: &str = "save_failed";
    pub const HONEYPOT: &str = "honeypot";
    pub const INVALID: &str = "invalid";
    pub const TOO_FAST: &str = "too_fast";
    pub const THROTTLED: &str = "throttled";
}

// 策略档位标签
pub mod profile_labels {
    // 列表
    pub const LISTING: &str = "listing";
    // 详情
    pub const DETAIL: &str = "detail";
}
