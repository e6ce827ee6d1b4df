use crate::{
    config::RateLimitConfig, error::AppError, metrics::METRICS, r#const::rate_limit_limits,
};
use dashmap::DashMap;
use std::{sync::Arc, time::Duration};
use tokio::time::Instant;
use tokio_graceful_shutdown::{IntoSubsystem, SubsystemHandle};
use tracing::{debug, info};

/// 准入结果：拒绝是正常返回值而不是错误
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Admission {
    // 是否放行
    pub allowed: bool,
    // 扣减后剩余令牌（拒绝时为 0）
    pub remaining: f64,
}

// 单个客户端的令牌桶
#[derive(Debug, Clone, Copy)]
struct Bucket {
    // 当前令牌数，范围 [0, max_tokens]
    tokens: f64,
    // 上次补充时间
    refilled_at: Instant,
}

/// 按客户端键的连续补充令牌桶
///
/// 令牌按 `max_tokens / window` 的速率连续补充，准入需要至少 1 个完整令牌，
/// 每次放行扣减 1 个。同一键上的读-改-写在 DashMap 分片锁内完成，并发准入计数是精确的。
pub struct RateLimiter {
    // 客户端令牌桶
    buckets: DashMap<String, Bucket>,
    // 桶容量
    max_tokens: f64,
    // 从空桶补满所需时间（毫秒）
    window_ms: f64,
    // 空闲超过该时间的桶可以被清理
    idle_ttl: Duration,
}

impl RateLimiter {
    pub fn new(max_tokens: u32, window: Duration) -> Self {
        let window_ms = window.as_millis().max(1) as f64;
        Self {
            buckets: DashMap::new(),
            max_tokens: f64::from(max_tokens.max(1)),
            window_ms,
            idle_ttl: window.saturating_mul(rate_limit_limits::DEFAULT_IDLE_SWEEP_WINDOWS),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        let window = Duration::from_millis(config.window_ms);
        Self::new(config.max_tokens, window)
            .with_idle_ttl(window.saturating_mul(config.idle_sweep_windows))
    }

    pub fn with_idle_ttl(mut self, idle_ttl: Duration) -> Self {
        self.idle_ttl = idle_ttl;
        self
    }

    /// 对客户端键进行准入检查
    pub fn admit(&self, key: &str) -> Admission {
        self.admit_at(key, Instant::now())
    }

    /// 以给定时间点进行准入检查
    pub fn admit_at(&self, key: &str, now: Instant) -> Admission {
        let key = if key.is_empty() {
            rate_limit_limits::UNKNOWN_KEY
        } else {
            key
        };

        // entry 持有分片写锁，补充、判断、扣减是原子的
        let mut bucket = self.buckets.entry(key.to_string()).or_insert(Bucket {
            tokens: self.max_tokens,
            refilled_at: now,
        });

        // 先乘后除，避免速率常量的舍入误差
        let elapsed_ms = now.saturating_duration_since(bucket.refilled_at).as_secs_f64() * 1000.0;
        bucket.tokens = (bucket.tokens + elapsed_ms * self.max_tokens / self.window_ms)
            .min(self.max_tokens);
        bucket.refilled_at = now;

        if bucket.tokens < 1.0 {
            debug!("Rate limit denied for key {:?}", key);
            return Admission {
                allowed: false,
                remaining: 0.0,
            };
        }

        bucket.tokens -= 1.0;
        Admission {
            allowed: true,
            remaining: bucket.tokens,
        }
    }

    /// 清理空闲的令牌桶，返回清理数量
    ///
    /// 空闲超过一个窗口的桶必然已经补满，删除后重新创建的效果相同。
    pub fn sweep(&self) -> usize {
        self.sweep_at(Instant::now())
    }

    pub fn sweep_at(&self, now: Instant) -> usize {
        let before = self.buckets.len();
        self.buckets
            .retain(|_, bucket| now.saturating_duration_since(bucket.refilled_at) < self.idle_ttl);
        let removed = before.saturating_sub(self.buckets.len());

        METRICS.ratelimit_buckets().set(self.buckets.len() as i64);
        removed
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// 定期清理空闲令牌桶的后台任务
pub struct BucketSweeper {
    // 限流器
    limiter: Arc<RateLimiter>,
    // 清理间隔
    interval: Duration,
}

impl BucketSweeper {
    pub fn new(limiter: Arc<RateLimiter>, interval: Duration) -> Self {
        Self { limiter, interval }
    }
}

#[async_trait::async_trait]
impl IntoSubsystem<AppError> for BucketSweeper {
    async fn run(self, subsys: SubsystemHandle) -> Result<(), AppError> {
        info!(
            "Rate limit bucket sweeper started, interval: {:?}",
            self.interval
        );

        let mut ticker = tokio::time::interval(self.interval);
        // 第一次 tick 立即返回，跳过
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let removed = self.limiter.sweep();
                    if removed > 0 {
                        debug!("Swept {} idle rate limit buckets, {} remain", removed, self.limiter.len());
                    }
                }
                _ = subsys.on_shutdown_requested() => {
                    info!("Shutdown requested, stopping bucket sweeper");
                    return Ok(());
                }
            }
        }
    }
}
