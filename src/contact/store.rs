use crate::{
    contact::{ContactMessage, NewComment},
    error::AppError,
};
use chrono::{DateTime, Utc};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

/// 连接池类型
pub type DbPool = Pool<SqliteConnectionManager>;

// 建表语句，启动时执行
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS contact_messages (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    email       TEXT NOT NULL,
    subject     TEXT NOT NULL,
    message     TEXT NOT NULL,
    phone       TEXT,
    ip          TEXT,
    user_agent  TEXT,
    created_at  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_contact_messages_created_at
    ON contact_messages (created_at DESC);
CREATE TABLE IF NOT EXISTS comments (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    movie_id    INTEGER NOT NULL,
    name        TEXT NOT NULL,
    body        TEXT NOT NULL,
    created_at  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_comments_movie
    ON comments (movie_id, created_at DESC);
";

const MESSAGE_COLUMNS: &str =
    "id, name, email, subject, message, phone, ip, user_agent, created_at";

// 关键字匹配姓名、邮箱、主题、正文与电话；?1 为空时不过滤
const SEARCH_FILTER: &str = r"(?1 IS NULL
    OR name LIKE ?1 ESCAPE '\'
    OR email LIKE ?1 ESCAPE '\'
    OR subject LIKE ?1 ESCAPE '\'
    OR message LIKE ?1 ESCAPE '\'
    OR IFNULL(phone, '') LIKE ?1 ESCAPE '\')";

/// 已保存的留言
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoredMessage {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub phone: Option<String>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// 影片评论
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub movie_id: i64,
    pub name: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// 翻页方向
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PageDirection {
    /// 更早的留言（id 小于游标）
    #[default]
    Next,
    /// 更新的留言（id 大于游标）
    Prev,
}

/// 管理端留言查询条件
#[derive(Debug, Clone, Default)]
pub struct MessageQuery {
    pub q: Option<String>,
    pub cursor: Option<i64>,
    pub direction: PageDirection,
    pub limit: usize,
}

/// 留言与影片评论存储（SQLite + r2d2 连接池）
///
/// 所有方法都是阻塞的，异步上下文中需要通过 `spawn_blocking` 调用
#[derive(Clone)]
pub struct ContactStore {
    pool: DbPool,
}

impl ContactStore {
    /// 打开数据库文件并创建表结构
    pub fn open(path: &str) -> Result<Self, AppError> {
        // 并发写入时等待锁而不是立即失败
        let manager = SqliteConnectionManager::file(path)
            .with_init(|conn| conn.busy_timeout(Duration::from_secs(5)));
        Self::with_manager(manager, 4)
    }

    /// 内存数据库，只用一个连接保证数据可见
    pub fn memory() -> Result<Self, AppError> {
        Self::with_manager(SqliteConnectionManager::memory(), 1)
    }

    fn with_manager(manager: SqliteConnectionManager, max_size: u32) -> Result<Self, AppError> {
        let pool = Pool::builder().max_size(max_size).build(manager)?;

        let conn = pool.get()?;
        conn.execute_batch(SCHEMA)?;
        info!("Contact store ready");

        Ok(Self { pool })
    }

    /// 连通性检查
    pub fn ping(&self) -> Result<(), AppError> {
        let conn = self.pool.get()?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }

    /// 写入一条留言，返回行 id
    pub fn insert(
        &self,
        msg: &ContactMessage,
        ip: Option<&str>,
        user_agent: Option<&str>,
    ) -> Result<i64, AppError> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO contact_messages
                (name, email, subject, message, phone, ip, user_agent, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                msg.name,
                msg.email,
                msg.subject,
                msg.message,
                msg.phone,
                ip,
                user_agent,
                Utc::now().to_rfc3339(),
            ],
        )?;

        let id = conn.last_insert_rowid();
        debug!("Saved contact message {}", id);
        Ok(id)
    }

    /// 最新的若干条留言，按时间倒序
    pub fn latest(&self, limit: usize) -> Result<Vec<StoredMessage>, AppError> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM contact_messages
             ORDER BY created_at DESC, id DESC
             LIMIT ?1"
        ))?;

        let rows = stmt.query_map(params![sql_limit(limit)], message_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(AppError::from)
    }

    /// 按关键字与 id 游标查询一页留言，结果始终按 id 倒序
    pub fn search(&self, query: &MessageQuery) -> Result<Vec<StoredMessage>, AppError> {
        let pattern = query
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(like_pattern);

        // 向前翻页时取游标之后最近的一页，再反转回倒序
        let (cursor_filter, order) = match query.direction {
            PageDirection::Next => ("id < ?2", "DESC"),
            PageDirection::Prev => ("id > ?2", "ASC"),
        };
        let sql = format!(
            "SELECT {MESSAGE_COLUMNS} FROM contact_messages
             WHERE {SEARCH_FILTER} AND (?2 IS NULL OR {cursor_filter})
             ORDER BY id {order}
             LIMIT ?3"
        );

        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![pattern, query.cursor, sql_limit(query.limit)],
            message_from_row,
        )?;
        let mut messages = rows.collect::<Result<Vec<_>, _>>()?;

        if query.direction == PageDirection::Prev {
            messages.reverse();
        }
        Ok(messages)
    }

    /// 写入一条评论并返回完整记录
    pub fn insert_comment(&self, comment: &NewComment) -> Result<Comment, AppError> {
        let created_at = Utc::now();
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO comments (movie_id, name, body, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                comment.movie_id,
                comment.name,
                comment.body,
                created_at.to_rfc3339(),
            ],
        )?;

        let id = conn.last_insert_rowid();
        debug!("Saved comment {} for movie {}", id, comment.movie_id);

        Ok(Comment {
            id,
            movie_id: comment.movie_id,
            name: comment.name.clone(),
            body: comment.body.clone(),
            created_at,
        })
    }

    /// 某部影片最新的若干条评论
    pub fn comments_for(&self, movie_id: i64, limit: usize) -> Result<Vec<Comment>, AppError> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, movie_id, name, body, created_at
             FROM comments
             WHERE movie_id = ?1
             ORDER BY created_at DESC, id DESC
             LIMIT ?2",
        )?;

        let rows = stmt.query_map(params![movie_id, sql_limit(limit)], |row| {
            Ok(Comment {
                id: row.get(0)?,
                movie_id: row.get(1)?,
                name: row.get(2)?,
                body: row.get(3)?,
                created_at: timestamp(row, 4)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(AppError::from)
    }

    /// 留言总数
    pub fn count(&self) -> Result<u64, AppError> {
        let conn = self.pool.get()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM contact_messages", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }
}

fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

// 转义 LIKE 通配符，按子串匹配
fn like_pattern(q: &str) -> String {
    let mut pattern = String::with_capacity(q.len() + 2);
    pattern.push('%');
    for c in q.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn timestamp(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn message_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredMessage> {
    Ok(StoredMessage {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        subject: row.get(3)?,
        message: row.get(4)?,
        phone: row.get(5)?,
        ip: row.get(6)?,
        user_agent: row.get(7)?,
        created_at: timestamp(row, 8)?,
    })
}
