use crate::{config::ContactConfig, r#const::contact_limits};
use serde::Deserialize;
use serde_json::Value;
use validator::ValidateEmail;

/// 表单校验规则
#[derive(Debug, Clone, Copy)]
pub struct ContactRules {
    // 表单加载到提交的最短时间（毫秒）
    pub min_fill_ms: i64,
    // 留言最大长度（字符）
    pub max_message: usize,
}

impl ContactRules {
    pub fn from_config(config: &ContactConfig) -> Self {
        Self {
            min_fill_ms: i64::try_from(config.min_fill_ms).unwrap_or(i64::MAX),
            max_message: config.max_message,
        }
    }
}

impl Default for ContactRules {
    fn default() -> Self {
        Self::from_config(&ContactConfig::default())
    }
}

/// 客户端提交的原始表单
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactSubmission {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
    pub phone: Option<String>,
    // 蜜罐字段，正常用户看不到
    pub company: Option<String>,
    // 表单加载时间（毫秒时间戳），数字或数字字符串
    pub ts: Option<Value>,
}

/// 校验通过的留言
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub phone: Option<String>,
}

/// 表单校验失败，field 为 None 表示非字段错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormRejection {
    pub field: Option<&'static str>,
    pub message: &'static str,
}

impl FormRejection {
    const fn field(field: &'static str, message: &'static str) -> Self {
        Self {
            field: Some(field),
            message,
        }
    }
}

/// 提交被判定为提交太快（机器人）
pub const TOO_FAST: FormRejection = FormRejection {
    field: None,
    message: "Submitted too quickly. Please try again.",
};

/// 筛选结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screening {
    // 蜜罐被填写：假装成功，不写入
    Honeypot,
    // 可以写入
    Accepted(ContactMessage),
}

fn trimmed(value: &Option<String>) -> String {
    value.as_deref().unwrap_or_default().trim().to_string()
}

impl ContactSubmission {
    /// 按顺序校验：蜜罐、姓名、邮箱、主题、留言、填写时间
    pub fn screen(&self, rules: &ContactRules, now_ms: i64) -> Result<Screening, FormRejection> {
        if !trimmed(&self.company).is_empty() {
            return Ok(Screening::Honeypot);
        }

        let name = trimmed(&self.name);
        let email = trimmed(&self.email);
        let subject = trimmed(&self.subject);
        let message = trimmed(&self.message);
        let phone = trimmed(&self.phone);

        if name.is_empty() {
            return Err(FormRejection::field("name", "Your name is required."));
        }
        if !is_valid_email(&email) {
            return Err(FormRejection::field("email", "Enter a valid email."));
        }
        if subject.is_empty() {
            return Err(FormRejection::field("subject", "Subject is required."));
        }
        if message.is_empty() {
            return Err(FormRejection::field("message", "Message can’t be empty."));
        }
        if message.chars().count() > rules.max_message {
            return Err(FormRejection::field("message", "Message is too long."));
        }

        // 时间戳陷阱
        match self.loaded_at() {
            Some(ts) if ts > 0 && now_ms.saturating_sub(ts) >= rules.min_fill_ms => {}
            _ => return Err(TOO_FAST),
        }

        Ok(Screening::Accepted(ContactMessage {
            name,
            email,
            subject,
            message,
            phone: (!phone.is_empty()).then_some(phone),
        }))
    }

    // 解析表单加载时间
    fn loaded_at(&self) -> Option<i64> {
        match self.ts.as_ref()? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f as i64),
            _ => None,
        }
    }
}

/// 邮箱格式：长度 3..=254，local@domain.tld，不含空白
pub fn is_valid_email(email: &str) -> bool {
    let len = email.chars().count();
    if !(contact_limits::EMAIL_MIN_LEN..=contact_limits::EMAIL_MAX_LEN).contains(&len) {
        return false;
    }

    let Some((_, domain)) = email.rsplit_once('@') else {
        return false;
    };

    // 域名必须包含点，且点不在首尾
    let has_tld = domain
        .find('.')
        .is_some_and(|i| i > 0 && i < domain.len() - 1);

    has_tld && email.validate_email()
}
