//! turn-server 主程序
//!
//! 加载配置，构造共享的会话凭据服务，启动会话 HTTP API 和 TURN 中继

mod cli;
mod error;
mod observability;

use clap::Parser;
use observability::init_observability;
use session::CredentialService;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use turn_server::service::{
    ServiceContainer, ServiceManager, ServiceType, SessionsHttpService, TurnService,
};
use turn_server_common::ServerConfig;

use tracing::{error, info, warn};

macro_rules! bootstrap_info {
    ($($arg:tt)*) => {
        println!($($arg)*);
    };
}

macro_rules! bootstrap_error {
    ($($arg:tt)*) => {
        eprintln!($($arg)*);
    };
}

use cli::{Cli, Commands};
use error::{Error, Result};

const SYSTEM_CONFIG_PATH: &str = "/etc/turn-server/config.toml";

/// Application launcher utilities
struct ApplicationLauncher;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Test { config_file }) => {
            let config_path =
                ApplicationLauncher::find_config_file(config_file.as_ref().unwrap_or(&cli.config))?;
            ApplicationLauncher::test_config_file(&config_path)
        }
        None => {
            let config_path = ApplicationLauncher::find_config_file(&cli.config)?;

            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;

            runtime.block_on(ApplicationLauncher::run_application(&config_path))
        }
    }
}

impl ApplicationLauncher {
    /// Find config file with fallback locations
    fn find_config_file(provided_path: &PathBuf) -> Result<PathBuf> {
        if provided_path != Path::new("config.toml") {
            if provided_path.exists() {
                bootstrap_info!("Using provided config file: {:?}", provided_path);
                return Ok(provided_path.clone());
            }
            bootstrap_error!("Provided config file not found: {:?}", provided_path);
            return Err(Error::custom(format!(
                "Config file not found: {provided_path:?}"
            )));
        }

        let fallback_paths = [
            PathBuf::from("config.toml"),
            PathBuf::from(SYSTEM_CONFIG_PATH),
        ];

        bootstrap_info!("Searching for config file in default locations...");

        for path in &fallback_paths {
            if path.exists() {
                bootstrap_info!("Found config file: {:?}", path);
                return Ok(path.clone());
            }
            bootstrap_info!("Config not found at: {:?}", path);
        }

        bootstrap_error!("No configuration file found!");
        bootstrap_error!("Please create a config file in one of these locations:");
        for (i, path) in fallback_paths.iter().enumerate() {
            bootstrap_error!("  {}. {:?}", i + 1, path);
        }
        bootstrap_error!("Or specify a custom path with: turn-server --config <path>");

        Err(Error::custom(
            "No configuration file found. Please create one or specify path with --config",
        ))
    }

    /// 加载并验证配置，打印所有问题
    ///
    /// 只有警告时返回配置；存在错误时返回 Err。
    fn load_config(config_path: &Path) -> Result<ServerConfig> {
        let config = ServerConfig::from_file(config_path).map_err(|e| {
            bootstrap_error!("❌ 配置文件解析失败: {}", e);
            Error::from(e)
        })?;
        bootstrap_info!("✅ 配置文件解析成功: {:?}", config_path);

        if let Err(errors) = config.validate() {
            bootstrap_error!("❌ 配置验证发现问题:");
            for (i, err) in errors.iter().enumerate() {
                if err.starts_with("Warning:") {
                    bootstrap_info!("  {}. ⚠️  {}", i + 1, err);
                } else {
                    bootstrap_error!("  {}. ❌ {}", i + 1, err);
                }
            }
            if errors.iter().any(|e| !e.starts_with("Warning:")) {
                return Err(Error::service_validation("配置验证失败，请修复上述错误"));
            }
        }

        Ok(config)
    }

    /// 测试配置文件是否有效
    fn test_config_file(config_path: &Path) -> Result<()> {
        Self::load_config(config_path)?;
        bootstrap_info!("✅ 配置验证通过");
        Ok(())
    }

    /// 运行应用程序的主入口
    async fn run_application(config_path: &Path) -> Result<()> {
        bootstrap_info!("📄 加载配置文件: {:?}", config_path);
        let config = Self::load_config(config_path)?;

        let _observability_guard = init_observability(&config)?;

        Self::run_services(config).await
    }

    async fn run_services(config: ServerConfig) -> Result<()> {
        info!("🚀 启动 turn-server: {} ({})", config.name, config.env);

        if let Err(e) = turn_server_common::metrics::register_metrics() {
            warn!("Prometheus metrics registration warning: {}", e);
        }

        // 凭据服务只构造一次，HTTP API 和 TURN 认证回调共享同一份
        let credentials = Arc::new(CredentialService::from_config(
            &config.services.sessions,
            &config.turn.realm,
        ));
        if let Err(e) = turn_server_common::metrics::register_active_sessions(credentials.clone()) {
            warn!("Failed to register active sessions metric: {}", e);
        }

        let (shutdown_tx, _) = tokio::sync::broadcast::channel::<()>(10);
        setup_ctrl_c_handler(shutdown_tx.clone()).await;

        let mut service_manager =
            Self::create_service_manager(&config, credentials, shutdown_tx.clone());

        let handles = service_manager.start_all().await.map_err(|e| {
            let _ = shutdown_tx.send(());
            Error::service_startup(e.to_string())
        })?;

        Self::display_service_info(&config, &service_manager);

        let mut task_error = None;
        for handle in handles {
            if let Err(e) = handle.await {
                error!("Service task terminated unexpectedly: {}", e);
                let _ = shutdown_tx.send(());
                task_error.get_or_insert(Error::from(e));
            }
        }
        service_manager.stop_all().await?;

        if let Some(e) = task_error {
            return Err(e);
        }
        info!("🛑 所有服务已安全关闭");
        Ok(())
    }

    /// 创建服务管理器
    fn create_service_manager(
        config: &ServerConfig,
        credentials: Arc<CredentialService>,
        shutdown_tx: tokio::sync::broadcast::Sender<()>,
    ) -> ServiceManager {
        info!("📊 计划启动的服务:");
        let mut service_manager = ServiceManager::new(config.clone(), shutdown_tx);

        if config.is_turn_enabled() {
            info!("  - TURN Server (UDP, 包含内置 STUN 支持)");
            let turn_service = TurnService::new(config.clone(), credentials.clone());
            service_manager.add_service(ServiceContainer::turn(turn_service));
        } else {
            info!("TURN 服务已禁用");
        }

        if config.is_sessions_enabled() {
            info!("  - Sessions API (/v1/sessions)");
            let sessions_service = SessionsHttpService::new(config, credentials);
            service_manager.add_service(ServiceContainer::sessions(sessions_service));
        }

        service_manager
    }

    /// 显示服务信息
    fn display_service_info(config: &ServerConfig, service_manager: &ServiceManager) {
        info!("✅ 所有服务已启动");
        for service in service_manager.service_infos() {
            info!("📡 {} 监听在: {}", service.name, service.url());
        }

        if config.is_sessions_enabled()
            && let Some(base) = service_manager
                .service_infos()
                .iter()
                .find(|s| s.service_type == ServiceType::Sessions)
                .map(|s| s.url())
        {
            info!("🔧 可用的API端点:");
            info!("  - POST   {}/sessions", base);
            info!("  - GET    {}/sessions/statistics", base);
            info!("  - DELETE {}/sessions/{{user_id}}", base);
            info!("  - GET    {}/health", base);
        }
    }
}

/// 设置Ctrl-C信号处理程序
async fn setup_ctrl_c_handler(shutdown_tx: tokio::sync::broadcast::Sender<()>) {
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("无法监听Ctrl-C信号: {}", e);
            return;
        }
        info!("收到Ctrl-C信号，开始优雅关闭...");
        let _ = shutdown_tx.send(());
    });
}
