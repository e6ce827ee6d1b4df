use once_cell::sync::Lazy;
use prometheus::{CounterVec, HistogramOpts, HistogramVec, IntGauge, Opts, Registry};

/// 应用指标
pub struct Metrics {
    registry: Registry,
    // 上游请求计数
    upstream_requests_total: CounterVec,
    // 上游请求耗时
    upstream_duration_seconds: HistogramVec,
    // 上游错误计数
    upstream_errors_total: CounterVec,
    // 降级为空结果的次数
    upstream_fallbacks_total: CounterVec,
    // HTTP请求计数
    http_requests_total: CounterVec,
    // 限流计数
    ratelimit_total: CounterVec,
    // 当前令牌桶数量
    ratelimit_buckets: IntGauge,
    // 联系表单提交结果计数
    contact_submissions_total: CounterVec,
}

impl Metrics {
    /// 创建新的指标收集器
    fn new() -> Self {
        let registry = Registry::new();

        // 上游请求计数
        let upstream_requests_total = CounterVec::new(
            Opts::new(
                "cinevault_upstream_requests_total",
                "Total number of logical requests sent to the catalog API.",
            ),
            &["profile"],
        )
        .unwrap();

        // 上游请求耗时
        let upstream_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "cinevault_upstream_duration_seconds",
                "The latency of logical catalog requests including retries, in seconds.",
            ),
            &["profile"],
        )
        .unwrap();

        // 上游错误计数
        let upstream_errors_total = CounterVec::new(
            Opts::new(
                "cinevault_upstream_errors_total",
                "Total number of failed catalog requests after retries.",
            ),
            &["error", "profile"],
        )
        .unwrap();

        // 降级计数
        let upstream_fallbacks_total = CounterVec::new(
            Opts::new(
                "cinevault_upstream_fallbacks_total",
                "Total number of non-critical catalog requests degraded to empty results.",
            ),
            &["profile"],
        )
        .unwrap();

        // HTTP请求计数
        let http_requests_total = CounterVec::new(
            Opts::new(
                "cinevault_http_requests_total",
                "Total number of incoming HTTP requests received by the web service.",
            ),
            &["route"],
        )
        .unwrap();

        // 限流计数
        let ratelimit_total = CounterVec::new(
            Opts::new(
                "cinevault_ratelimit_total",
                "Total number of requests that were rejected due to rate limiting.",
            ),
            &["route"],
        )
        .unwrap();

        // 令牌桶数量
        let ratelimit_buckets = IntGauge::new(
            "cinevault_ratelimit_buckets",
            "Number of rate limit buckets currently held in memory.",
        )
        .unwrap();

        // 联系表单提交计数
        let contact_submissions_total = CounterVec::new(
            Opts::new(
                "cinevault_contact_submissions_total",
                "Total number of contact form submissions by outcome.",
            ),
            &["outcome"],
        )
        .unwrap();

        // 注册指标
        registry
            .register(Box::new(upstream_requests_total.clone()))
            .unwrap();
        registry
            .register(Box::new(upstream_duration_seconds.clone()))
            .unwrap();
        registry
            .register(Box::new(upstream_errors_total.clone()))
            .unwrap();
        registry
            .register(Box::new(upstream_fallbacks_total.clone()))
            .unwrap();
        registry
            .register(Box::new(http_requests_total.clone()))
            .unwrap();
        registry
            .register(Box::new(ratelimit_total.clone()))
            .unwrap();
        registry
            .register(Box::new(ratelimit_buckets.clone()))
            .unwrap();
        registry
            .register(Box::new(contact_submissions_total.clone()))
            .unwrap();

        Self {
            registry,
            upstream_requests_total,
            upstream_duration_seconds,
            upstream_errors_total,
            upstream_fallbacks_total,
            http_requests_total,
            ratelimit_total,
            ratelimit_buckets,
            contact_submissions_total,
        }
    }

    /// 获取注册表
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// 上游请求计数
    pub fn upstream_requests_total(&self) -> &CounterVec {
        &self.upstream_requests_total
    }

    /// 上游请求耗时
    pub fn upstream_duration_seconds(&self) -> &HistogramVec {
        &self.upstream_duration_seconds
    }

    /// 上游错误计数
    pub fn upstream_errors_total(&self) -> &CounterVec {
        &self.upstream_errors_total
    }

    /// 降级计数
    pub fn upstream_fallbacks_total(&self) -> &CounterVec {
        &self.upstream_fallbacks_total
    }

    /// HTTP请求计数
    pub fn http_requests_total(&self) -> &CounterVec {
        &self.http_requests_total
    }

    /// 限流计数
    pub fn ratelimit_total(&self) -> &CounterVec {
        &self.ratelimit_total
    }

    /// 令牌桶数量
    pub fn ratelimit_buckets(&self) -> &IntGauge {
        &self.ratelimit_buckets
    }

    /// 联系表单提交计数
    pub fn contact_submissions_total(&self) -> &CounterVec {
        &self.contact_submissions_total
    }
}

/// 全局指标实例
pub static METRICS: Lazy<Metrics> = Lazy::new(Metrics::new);
