use crate::r#const::shutdown_timeout;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

// CineVault - 影视发现后端服务
#[derive(Parser, Debug, Clone)]
#[command(
    name = "cinevaultd",
    author,
    version,
    about = "Movie and TV discovery backend serving catalog listings, search, title details and a rate-limited contact form.\n\n\
             Key Features:\n\
             - Resilient Catalog Client: Per-profile timeouts, bounded retries on network failures, and empty-result fallback for non-critical endpoints.\n\
             - Availability Lookups: Optional regional streaming/rental/purchase data, silently skipped when unavailable.\n\
             - Contact Workflow: Honeypot, field validation, fill-time trap and SQLite persistence.\n\
             - Fine-grained Traffic Control: Per-client token bucket with continuous refill and idle bucket sweeping.\n\
             - Observability: Health check and Prometheus metrics on a separate admin port."
)]
pub struct Args {
    // 配置文件路径
    #[clap(
        short,
        long,
        value_name = "FILE",
        default_value = "config.yaml",
        help = "Path to the configuration file"
    )]
    pub config: PathBuf,

    // 是否开启调试模式
    #[clap(
        short,
        long,
        action = ArgAction::SetTrue,
        help = "Enable debug mode"
    )]
    pub debug: bool,

    // 是否仅测试配置文件
    #[clap(
        short = 't',
        long = "test",
        action = ArgAction::SetTrue,
        help = "Test configuration file for validity and exit"
    )]
    pub test_config: bool,

    // 优雅关闭超时时间（秒）
    #[clap(
        long = "shutdown-timeout",
        value_name = "SECONDS",
        default_value_t = shutdown_timeout::DEFAULT,
        help = "Maximum time in seconds to wait for complete shutdown"
    )]
    pub shutdown_timeout: u64,
}

impl Args {
    // 解析命令行参数
    pub fn parse_args() -> Self {
        Self::parse()
    }

    // 验证参数
    pub fn validation(&self) -> Result<(), String> {
        // 验证关闭超时时间
        if self.shutdown_timeout < shutdown_timeout::MIN
            || self.shutdown_timeout > shutdown_timeout::MAX
        {
            return Err(format!(
                "Shutdown timeout must be between {} and {} seconds",
                shutdown_timeout::MIN,
                shutdown_timeout::MAX
            ));
        }

        Ok(())
    }
}
