use crate::error::AppError;
use dashmap::DashMap;
use serde_json::Value;
use std::{sync::Arc, time::Duration};
use tokio::time::Instant;
use tokio_graceful_shutdown::{IntoSubsystem, SubsystemHandle};
use tracing::{debug, info};

// 缓存条目
struct CachedBody {
    body: Value,
    expires_at: Instant,
}

/// 按键缓存成功响应体
///
/// 读取时发现过期会顺带删除，其余过期条目由 `CacheSweeper` 定期清理。
/// 克隆共享同一份存储。
#[derive(Clone, Default)]
pub struct ResponseCache {
    entries: Arc<DashMap<String, CachedBody>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        let now = Instant::now();
        if let Some(entry) = self.entries.get(key) {
            if entry.expires_at > now {
                return Some(entry.body.clone());
            }
        }
        // 确认过期后再删除，避免误删刚写入的新值
        self.entries.remove_if(key, |_, entry| entry.expires_at <= now);
        None
    }

    /// 写入缓存，ttl 为 0 时不缓存
    pub fn insert(&self, key: String, body: Value, ttl: Duration) {
        if ttl.is_zero() {
            return;
        }
        self.entries.insert(
            key,
            CachedBody {
                body,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    /// 删除所有过期条目，返回删除数量
    pub fn sweep(&self) -> usize {
        self.sweep_at(Instant::now())
    }

    pub fn sweep_at(&self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        before.saturating_sub(self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 定期清理过期响应的后台任务
pub struct CacheSweeper {
    // 需要清理的缓存（目录响应、可用性查询）
    caches: Vec<ResponseCache>,
    // 清理间隔
    interval: Duration,
}

impl CacheSweeper {
    pub fn new(caches: Vec<ResponseCache>, interval: Duration) -> Self {
        Self { caches, interval }
    }

    // 清理一轮，返回删除总数
    fn sweep_all(&self) -> usize {
        self.caches.iter().map(ResponseCache::sweep).sum()
    }
}

#[async_trait::async_trait]
impl IntoSubsystem<AppError> for CacheSweeper {
    async fn run(self, subsys: SubsystemHandle) -> Result<(), AppError> {
        info!("Response cache sweeper started, interval: {:?}", self.interval);

        let mut ticker = tokio::time::interval(self.interval);
        // 第一次 tick 立即返回，跳过
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let removed = self.sweep_all();
                    if removed > 0 {
                        debug!("Swept {} expired cached responses", removed);
                    }
                }
                _ = subsys.on_shutdown_requested() => {
                    info!("Shutdown requested, stopping response cache sweeper");
                    return Ok(());
                }
            }
        }
    }
}
