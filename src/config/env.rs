use crate::error::AppError;
use crate::r#const::env_keys;
use std::str::FromStr;
use tracing::debug;

use super::Config;

impl Config {
    // 使用进程环境变量覆盖配置
    pub fn apply_env(&mut self) -> Result<(), AppError> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    // 使用给定的查找函数覆盖配置，空值视为未设置
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = env_keys::CATALOG_BEARER.iter().find_map(|key| lookup(key)) {
            debug!("Catalog bearer token taken from environment");
            self.catalog.bearer_token = Some(token);
        }

        if let Some(key) = lookup(env_keys::CATALOG_API_KEY) {
            self.catalog.api_key = Some(key);
        }

        if let Some(value) = lookup(env_keys::CATALOG_TIMEOUT_MS) {
            self.catalog.detail.timeout_ms = parse_number(env_keys::CATALOG_TIMEOUT_MS, &value)?;
        }

        if let Some(value) = lookup(env_keys::CATALOG_RETRIES) {
            self.catalog.detail.retries = parse_number(env_keys::CATALOG_RETRIES, &value)?;
        }

        if let Some(key) = lookup(env_keys::AVAILABILITY_API_KEY) {
            self.availability.api_key = Some(key);
        }

        if let Some(key) = lookup(env_keys::ADMIN_KEY) {
            self.admin.key = Some(key);
        }

        if let Some(path) = lookup(env_keys::DATABASE_PATH) {
            self.contact.database_path = path;
        }

        Ok(())
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T, AppError> {
    value.trim().parse().map_err(|_| {
        AppError::Config(format!(
            "Environment variable {} must be a non-negative integer, got {:?}",
            key, value
        ))
    })
}
