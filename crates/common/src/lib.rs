//! turn-server 通用基础设施库
//!
//! 为会话服务和 TURN 中继提供统一配置和 Prometheus 指标注册

pub mod config;
pub mod metrics;

pub use config::{ConfigError, ServerConfig};
