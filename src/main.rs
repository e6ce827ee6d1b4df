use cinevault::{
    admin::AdminServer,
    catalog::CacheSweeper,
    args::Args,
    config::Config,
    error::AppError,
    ratelimit::BucketSweeper,
    server::{AppState, WebServer},
};
use mimalloc::MiMalloc;
use std::{process, sync::Arc, time::Duration};
use tokio_graceful_shutdown::{IntoSubsystem, SubsystemBuilder, Toplevel};
use tracing::{error, info};

// 使用 mimalloc 分配器提高内存效率
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn init_logging(args: &Args) {
    let builder = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_line_number(false);

    // 如果启用调试模式，输出调试信息，否则只输出 info 及以上级别
    if args.debug {
        builder.with_max_level(tracing::Level::DEBUG)
    } else {
        builder.with_max_level(tracing::Level::INFO)
    }
    .init();
}

// 程序入口
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 解析命令行参数
    let args = Args::parse_args();

    // 初始化日志
    init_logging(&args);

    // 验证参数
    if let Err(e) = args.validation() {
        error!("Invalid command line arguments: {}", e);
        process::exit(1);
    }

    info!("Starting CineVault - Movie Discovery Service");

    // 加载配置
    let config = match Config::from_file(&args.config) {
        Ok(config) => {
            info!("Successfully loaded configuration: {:?}", args.config);
            config
        }
        Err(e) => {
            error!("Failed to load configuration file: {}", e);
            process::exit(1);
        }
    };

    // 如果是测试模式，成功验证配置后退出
    if args.test_config {
        info!("Configuration file validated successfully");
        return Ok(());
    }

    // 创建应用组件
    let components = match create_components(&config) {
        Ok(components) => components,
        Err(e) => {
            error!("Failed to create application components: {}", e);
            process::exit(1);
        }
    };

    // 创建优雅关闭顶层管理器
    let toplevel = Toplevel::new(|s| async move {
        // 启动管理服务子系统
        let admin_server = components.admin_server;
        s.start(SubsystemBuilder::new("admin_server", move |s| async move {
            admin_server.run(s).await
        }));

        // 启动 Web 服务子系统
        let web_server = components.web_server;
        s.start(SubsystemBuilder::new("web_server", move |s| async move {
            web_server.run(s).await
        }));

        // 启动令牌桶清理子系统
        let sweeper = components.sweeper;
        s.start(SubsystemBuilder::new("bucket_sweeper", move |s| async move {
            sweeper.run(s).await
        }));

        // 启动响应缓存清理子系统
        let cache_sweeper = components.cache_sweeper;
        s.start(SubsystemBuilder::new("cache_sweeper", move |s| async move {
            cache_sweeper.run(s).await
        }));
    });

    // 等待关闭
    info!("All services started, waiting for requests...");
    match toplevel
        .catch_signals()
        .handle_shutdown_requests(tokio::time::Duration::from_secs(args.shutdown_timeout))
        .await
    {
        Ok(_) => {
            info!("Application gracefully shutdown");
            Ok(())
        }
        Err(e) => {
            error!("Application shutdown error: {}", e);
            process::exit(1);
        }
    }
}

// 应用组件
struct AppComponents {
    // 管理服务
    admin_server: AdminServer,
    // Web 服务
    web_server: WebServer,
    // 令牌桶清理任务
    sweeper: BucketSweeper,
    // 响应缓存清理任务
    cache_sweeper: CacheSweeper,
}

// 创建应用组件
fn create_components(config: &Config) -> Result<AppComponents, AppError> {
    // 应用上下文：目录客户端、可用性客户端、限流器、留言存储
    let state = match AppState::new(config) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            error!("Failed to initialize application state: {}", e);
            return Err(e);
        }
    };

    let web_server = WebServer::new(&config.http_server.web, state.clone())?;
    info!(
        "Web server initialized successfully: {:?}",
        web_server.get_addr()
    );

    let sweeper = BucketSweeper::new(
        state.limiter.clone(),
        Duration::from_secs(config.rate_limit.sweep_interval),
    );

    let cache_sweeper = CacheSweeper::new(
        vec![
            state.catalog.cache().clone(),
            state.availability.cache().clone(),
        ],
        Duration::from_secs(config.catalog.cache_sweep_interval),
    );

    // 创建管理服务
    let admin_config = &config.http_server.admin;
    let admin_addr = format!("{}:{}", admin_config.address, admin_config.port)
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid admin server address: {}", e)))?;
    let admin_server = AdminServer::new(admin_addr);
    info!("Admin server initialized successfully: {:?}", admin_addr);

    Ok(AppComponents {
        admin_server,
        web_server,
        sweeper,
        cache_sweeper,
    })
}
