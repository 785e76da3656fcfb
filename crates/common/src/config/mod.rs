//! 统一配置管理系统
//!
//! TURN 凭据服务配置的唯一来源：字段定义、默认值和校验都在这里。

pub mod bind;
pub mod error;
pub mod services;
pub mod turn;

pub use crate::config::bind::{BindConfig, HttpBindConfig, IceBindConfig};
pub use crate::config::error::ConfigError;
pub use crate::config::services::ServicesConfig;
pub use crate::config::turn::TurnConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 服务主配置
///
/// 配置文件使用 TOML 格式。
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    /// Service enable flags (bitmask)
    ///
    /// Bit positions:
    /// - Bit 0 (1): Sessions HTTP API
    /// - Bit 1 (2): TURN relay
    ///
    /// `enable = 3` runs both.
    #[serde(default = "default_enable")]
    pub enable: u8,

    /// 服务器实例名称
    ///
    /// 用于在日志和监控中区分不同节点，如 turn-01、turn-prod-east-1。
    pub name: String,

    /// 运行环境标识
    ///
    /// - "dev": 开发环境
    /// - "prod": 生产环境，启用额外的安全检查
    /// - "test": 测试环境，用于自动化测试
    pub env: String,

    /// 网络绑定配置
    #[serde(default)]
    pub bind: BindConfig,

    /// TURN 服务配置
    #[serde(default)]
    pub turn: TurnConfig,

    /// 服务配置集合
    #[serde(default)]
    pub services: ServicesConfig,

    /// 可观测性配置
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// 可观测性配置
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ObservabilityConfig {
    /// 过滤级别
    ///
    /// 支持 EnvFilter 语法（如 "info,hyper=warn"）。默认值 "info"。
    #[serde(default = "default_filter_level")]
    pub filter_level: String,

    #[serde(default)]
    pub log: LogConfig,
}

/// 日志配置
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogConfig {
    /// 日志输出目标："console"（默认）或 "file"
    #[serde(default = "default_log_output")]
    pub output: String,

    /// 日志轮转开关
    ///
    /// 当 output = "file" 时有效：true 按天轮转，false 追加到单个文件。
    #[serde(default)]
    pub rotate: bool,

    /// 日志目录，当 output = "file" 时有效
    #[serde(default = "default_log_path")]
    pub path: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            filter_level: default_filter_level(),
            log: LogConfig::default(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            output: default_log_output(),
            rotate: false,
            path: default_log_path(),
        }
    }
}

fn default_enable() -> u8 {
    ENABLE_SESSIONS | ENABLE_TURN
}

fn default_log_output() -> String {
    "console".to_string()
}

fn default_log_path() -> String {
    "logs/".to_string()
}

fn default_filter_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enable: default_enable(),
            name: "turn-server-default".to_string(),
            env: "dev".to_string(),
            bind: BindConfig::default(),
            turn: TurnConfig::default(),
            services: ServicesConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

// 服务启用标志位常量
pub const ENABLE_SESSIONS: u8 = 0b01;
pub const ENABLE_TURN: u8 = 0b10;
const ENABLE_MASK: u8 = ENABLE_SESSIONS | ENABLE_TURN;

impl ServerConfig {
    /// 检查是否启用了会话 HTTP API
    pub fn is_sessions_enabled(&self) -> bool {
        self.enable & ENABLE_SESSIONS != 0
    }

    /// 检查是否启用了 TURN 中继
    pub fn is_turn_enabled(&self) -> bool {
        self.enable & ENABLE_TURN != 0
    }

    /// 返回日志配置引用
    pub fn log_config(&self) -> &LogConfig {
        &self.observability.log
    }

    /// 检查是否使用控制台日志输出
    pub fn is_console_logging(&self) -> bool {
        self.observability.log.output == "console"
    }

    /// 获取过滤级别，优先使用 RUST_LOG
    pub fn get_filter_level(&self) -> String {
        std::env::var("RUST_LOG")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| self.observability.filter_level.clone())
    }

    /// 从文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();

        if !path_ref.exists() {
            return Err(ConfigError::FileNotFound {
                path: path_ref.display().to_string(),
            });
        }

        if !path_ref.is_file() {
            return Err(ConfigError::NotAFile {
                path: path_ref.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path_ref)?;
        Ok(Self::from_toml(&content)?)
    }

    /// 从 TOML 字符串加载配置
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 将配置序列化为 TOML 字符串
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }

    /// 验证配置有效性
    ///
    /// 以 "Warning:" 开头的条目不阻止启动。
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.enable & !ENABLE_MASK != 0 {
            errors.push(format!(
                "Invalid enable bitmask value: {}. Must be between 0 and {} (2 bits)",
                self.enable, ENABLE_MASK
            ));
        }

        if self.enable & ENABLE_MASK == 0 {
            errors.push("Warning: no service is enabled (enable = 0)".to_string());
        }

        if self.name.trim().is_empty() {
            errors.push("Instance name cannot be empty".to_string());
        }

        if !["dev", "prod", "test"].contains(&self.env.as_str()) {
            errors.push(format!(
                "Invalid environment '{}', must be one of: dev, prod, test",
                self.env
            ));
        }

        let main_level = self
            .observability
            .filter_level
            .split(',')
            .next()
            .unwrap_or("")
            .trim();
        if !["trace", "debug", "info", "warn", "error"].contains(&main_level) {
            errors.push(format!(
                "Invalid filter level '{}', must start with one of: trace, debug, info, warn, error",
                self.observability.filter_level
            ));
        }

        if !["console", "file"].contains(&self.observability.log.output.as_str()) {
            errors.push(format!(
                "Invalid log output '{}' (observability.log.output), must be 'console' or 'file'",
                self.observability.log.output
            ));
        }

        if self.is_sessions_enabled() {
            match &self.bind.http {
                Some(http) => {
                    if http.ip.parse::<std::net::IpAddr>().is_err() {
                        errors.push(format!(
                            "Invalid bind.http ip '{}', must be a valid IP address",
                            http.ip
                        ));
                    }
                    // 会话 API 接收共享密钥，不应明文暴露到公网
                    if self.env == "prod" && !http.is_loopback() {
                        errors.push(format!(
                            "Warning: sessions API binds to non-loopback address {} without TLS in production",
                            http.bind_addr()
                        ));
                    }
                }
                None => errors.push(
                    "Sessions API is enabled (ENABLE_SESSIONS bit is set) but bind.http is missing"
                        .to_string(),
                ),
            }
        }

        // realm 同时参与密钥派生，即使只开启会话 API 也必须有效
        if self.turn.realm.trim().is_empty() {
            errors.push("TURN realm cannot be empty".to_string());
        }

        if self.is_turn_enabled() {
            if self.turn.advertised_ip.parse::<std::net::IpAddr>().is_err() {
                errors.push(format!(
                    "Invalid TURN advertised_ip '{}', must be a valid IP address",
                    self.turn.advertised_ip
                ));
            }
            if self.bind.ice.ip.parse::<std::net::IpAddr>().is_err() {
                errors.push(format!(
                    "Invalid bind.ice ip '{}', must be a valid IP address",
                    self.bind.ice.ip
                ));
            }
            if let Err(e) = self.turn.relay_ports() {
                errors.push(format!("{e}, expected '<min>-<max>' with 0 < min <= max"));
            }
        }

        if self.env == "prod" && self.is_console_logging() {
            errors.push("Warning: Production environment should use file logging (observability.log.output = \"file\")".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
