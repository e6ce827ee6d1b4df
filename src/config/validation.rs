use crate::error::AppError;
use tracing::debug;
use url::Url;
use validator::Validate;

use super::Config;

impl Config {
    // 验证配置
    pub fn validate(&self) -> Result<(), AppError> {
        // 字段范围校验
        Validate::validate(self)
            .map_err(|e| AppError::Config(format!("Configuration validation failed: {}", e)))?;

        // 验证 API 地址格式
        validate_base_url("catalog.baseUrl", &self.catalog.base_url)?;
        validate_base_url("availability.baseUrl", &self.availability.base_url)?;

        // 验证监听地址
        for (name, address, port) in [
            (
                "Web service",
                &self.http_server.web.address,
                self.http_server.web.port,
            ),
            (
                "Admin service",
                &self.http_server.admin.address,
                self.http_server.admin.port,
            ),
        ] {
            format!("{}:{}", address, port)
                .parse::<std::net::SocketAddr>()
                .map_err(|e| {
                    AppError::Config(format!(
                        "{} listen address '{}:{}' is invalid: {}",
                        name, address, port, e
                    ))
                })?;
        }

        if self.http_server.web.port != 0
            && self.http_server.web.port == self.http_server.admin.port
        {
            return Err(AppError::Config(format!(
                "Web service and admin service cannot share port {}",
                self.http_server.web.port
            )));
        }

        // 凭据在客户端创建时检查，这里只提示
        if self.catalog.bearer_token.is_none() && self.catalog.api_key.is_none() {
            debug!("No catalog credentials in configuration file or environment");
        }

        Ok(())
    }
}

fn validate_base_url(field: &str, value: &str) -> Result<(), AppError> {
    let url = Url::parse(value)
        .map_err(|e| AppError::Config(format!("{} '{}' is invalid: {}", field, value, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::Config(format!(
            "{} '{}' must use http or https",
            field, value
        )));
    }

    Ok(())
}
