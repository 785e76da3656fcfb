//! 日志初始化
//!
//! 控制台或文件输出，`RUST_LOG` 优先于配置中的 filter_level

use crate::error::Result;
use std::fs;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};
use turn_server_common::ServerConfig;
use turn_server_common::config::LogConfig;

const LOG_FILE_NAME: &str = "turn-server.log";

/// 日志资源守卫，drop 时刷新文件写入缓冲
#[derive(Default)]
pub struct ObservabilityGuard {
    _log_guard: Option<WorkerGuard>,
}

/// 根据配置初始化日志
pub fn init_observability(config: &ServerConfig) -> Result<ObservabilityGuard> {
    let mut guard = ObservabilityGuard::default();

    if config.is_console_logging() {
        init_subscriber_with_writer(std::io::stdout, true, config);
    } else {
        let log_config = config.log_config();
        fs::create_dir_all(&log_config.path)?;
        let (non_blocking, worker_guard) = build_file_writer(log_config)?;
        guard._log_guard = Some(worker_guard);

        init_subscriber_with_writer(non_blocking, false, config);
    }

    Ok(guard)
}

/// 创建 EnvFilter，RUST_LOG 优先
fn create_env_filter(config: &ServerConfig) -> EnvFilter {
    let directive = config.get_filter_level();

    EnvFilter::try_new(&directive).unwrap_or_else(|_| {
        println!("Failed to parse filter directive: {directive}. Falling back to default: info");
        EnvFilter::new("info")
    })
}

fn init_subscriber_with_writer<W>(writer: W, use_ansi: bool, config: &ServerConfig)
where
    W: for<'a> fmt::MakeWriter<'a> + Send + Sync + 'static,
{
    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(use_ansi)
        .with_writer(writer);

    // 已经初始化过（如测试中重复调用）时忽略
    tracing_subscriber::registry()
        .with(create_env_filter(config))
        .with(fmt_layer)
        .try_init()
        .ok();
}

fn build_file_writer(log_config: &LogConfig) -> Result<(NonBlocking, WorkerGuard)> {
    println!(
        "日志写入文件: {}/{} (轮转: {})",
        log_config.path.trim_end_matches('/'),
        LOG_FILE_NAME,
        if log_config.rotate {
            "按天"
        } else {
            "关闭"
        }
    );

    if log_config.rotate {
        let file_appender = tracing_appender::rolling::daily(&log_config.path, LOG_FILE_NAME);
        Ok(tracing_appender::non_blocking(file_appender))
    } else {
        let log_file_path = std::path::Path::new(&log_config.path).join(LOG_FILE_NAME);
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file_path)?;
        Ok(tracing_appender::non_blocking(file))
    }
}
