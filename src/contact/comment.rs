use crate::r#const::comment_limits;
use serde::Deserialize;
use serde_json::Value;

/// 评论提交的原始载荷
///
/// `movieId` 既可以是数字也可以是数字字符串
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentSubmission {
    #[serde(default)]
    pub movie_id: Option<Value>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

/// 规范化后的评论，可直接写入存储
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub movie_id: i64,
    pub name: String,
    pub body: String,
}

impl CommentSubmission {
    /// 校验并规范化评论
    ///
    /// 影片 id 无效或正文为空时返回 `None`
    pub fn normalize(&self) -> Option<NewComment> {
        let movie_id = self.movie_id.as_ref().and_then(parse_movie_id)?;

        let body = truncate_chars(
            self.body.as_deref().unwrap_or_default().trim(),
            comment_limits::BODY_MAX_CHARS,
        );
        if body.is_empty() {
            return None;
        }

        let name = self.name.as_deref().map(str::trim).unwrap_or_default();
        let name = if name.is_empty() {
            comment_limits::DEFAULT_NAME.to_string()
        } else {
            truncate_chars(name, comment_limits::NAME_MAX_CHARS)
        };

        Some(NewComment {
            movie_id,
            name,
            body,
        })
    }
}

/// 解析影片 id，只接受正整数
pub fn parse_movie_id(value: &Value) -> Option<i64> {
    let id = match value {
        Value::Number(n) => match n.as_i64() {
            Some(id) => id,
            None => {
                let f = n.as_f64()?;
                if f.fract() != 0.0 || f < 1.0 || f > i64::MAX as f64 {
                    return None;
                }
                f as i64
            }
        },
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };

    (id > 0).then_some(id)
}

// 按字符截断，避免切在多字节字符中间
fn truncate_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}
