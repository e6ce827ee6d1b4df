use crate::{
    availability::AvailabilityClient,
    catalog::CatalogClient,
    config::Config,
    contact::{ContactRules, ContactStore},
    error::AppError,
    ratelimit::RateLimiter,
};
use std::sync::Arc;
use tracing::{info, warn};

/// 应用上下文，启动时构建一次，注入到所有处理程序
pub struct AppState {
    // 目录 API 客户端
    pub catalog: CatalogClient,
    // 可用性查询客户端
    pub availability: AvailabilityClient,
    // 联系表单与评论共用的限流器（与清理任务共享）
    pub limiter: Arc<RateLimiter>,
    // 留言与评论存储
    pub contacts: ContactStore,
    // 表单校验规则
    pub contact_rules: ContactRules,
    // 管理端密钥，None 时管理接口不可用
    pub admin_key: Option<String>,
    // 是否在响应中暴露内部错误
    pub expose_errors: bool,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let catalog = CatalogClient::new(&config.catalog)?;
        let availability = AvailabilityClient::new(&config.availability)?;
        let limiter = Arc::new(RateLimiter::from_config(&config.rate_limit));

        let contacts = ContactStore::open(&config.contact.database_path)?;
        // 连通性检查失败不阻止启动，写入时会再次报错
        match contacts.ping() {
            Ok(()) => info!(
                "Contact store ping OK: {:?}",
                config.contact.database_path
            ),
            Err(e) => warn!("Contact store ping failed: {}", e),
        }

        let admin_key = config
            .admin
            .key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string);
        if admin_key.is_none() {
            info!("Admin key not configured, message listing is disabled");
        }

        Ok(Self {
            catalog,
            availability,
            limiter,
            contacts,
            contact_rules: ContactRules::from_config(&config.contact),
            admin_key,
            expose_errors: config.contact.expose_errors,
        })
    }
}
