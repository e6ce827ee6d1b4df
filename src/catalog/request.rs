use crate::{error::AppError, r#const::catalog_limits};
use std::fmt;
use url::Url;

/// 查询参数值
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl QueryValue {
    // 空字符串视为未设置
    fn into_param(self) -> Option<String> {
        match self {
            QueryValue::Str(s) if s.is_empty() => None,
            QueryValue::Str(s) => Some(s),
            QueryValue::Int(i) => Some(i.to_string()),
            QueryValue::Bool(b) => Some(b.to_string()),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Str(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Str(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Bool(value)
    }
}

macro_rules! impl_int_query_value {
    ($($t:ty),*) => {
        $(impl From<$t> for QueryValue {
            fn from(value: $t) -> Self {
                QueryValue::Int(value as i64)
            }
        })*
    };
}

impl_int_query_value!(i32, i64, u16, u32, u64);

/// 有序查询参数集合，未设置与空值的参数不会出现在最终 URL 中
#[derive(Debug, Clone, Default)]
pub struct Query {
    params: Vec<(&'static str, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置参数，同名参数会被覆盖
    pub fn param(mut self, key: &'static str, value: impl Into<QueryValue>) -> Self {
        self.params.retain(|(k, _)| *k != key);
        if let Some(value) = value.into().into_param() {
            self.params.push((key, value));
        }
        self
    }

    /// 设置可选参数，None 时忽略
    pub fn param_opt<V: Into<QueryValue>>(self, key: &'static str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.params.iter().any(|(k, _)| *k == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// 目录 API 凭据，两种方式互斥，Bearer 优先
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    // Authorization: Bearer <token>
    Bearer(String),
    // 查询参数 api_key=<key>
    ApiKey(String),
}

impl Credentials {
    /// 解析凭据，两者都缺失时返回配置错误
    pub fn resolve(bearer: Option<&str>, api_key: Option<&str>) -> Result<Self, AppError> {
        if let Some(token) = non_empty(bearer) {
            return Ok(Credentials::Bearer(token.to_string()));
        }
        if let Some(key) = non_empty(api_key) {
            return Ok(Credentials::ApiKey(key.to_string()));
        }

        Err(AppError::Config(
            "Catalog credentials missing: set a bearer token or an API key".to_string(),
        ))
    }
}

// 去除空白后为空视为未配置
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// 避免凭据出现在日志中
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Bearer(_) => f.write_str("Credentials::Bearer(***)"),
            Credentials::ApiKey(_) => f.write_str("Credentials::ApiKey(***)"),
        }
    }
}

/// 构建请求URL：基础地址 + 路径 + 查询参数，必要时追加 api_key
pub fn build_request_url(
    base_url: &str,
    path: &str,
    query: &Query,
    credentials: &Credentials,
) -> Result<Url, AppError> {
    // 使用 String::with_capacity 预分配内存
    let base = base_url.trim_end_matches('/');
    let mut raw = String::with_capacity(base.len() + path.len() + 1);
    raw.push_str(base);
    if !path.starts_with('/') {
        raw.push('/');
    }
    raw.push_str(path);

    let mut url = Url::parse(&raw).map_err(|e| AppError::Upstream {
        path: path.to_string(),
        status: None,
        reason: format!("Invalid upstream URL {}: {}", raw, e),
    })?;

    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in query.iter() {
            pairs.append_pair(key, value);
        }
    }

    if let Credentials::ApiKey(key) = credentials {
        if !query.contains(catalog_limits::API_KEY_PARAM) {
            url.query_pairs_mut()
                .append_pair(catalog_limits::API_KEY_PARAM, key);
        }
    }

    Ok(url)
}
