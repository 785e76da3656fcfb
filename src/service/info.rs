//! 服务信息管理模块

use serde::{Deserialize, Serialize};
use tracing::{error, info};
use turn_server_common::ServerConfig;
use url::Url;

use super::ServiceType;

/// 服务运行状态
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ServiceStatus {
    #[default]
    Unknown,
    /// 运行中，携带对外地址
    Running(String),
    Error(String),
}

/// 服务基本信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// 服务名称
    pub name: String,
    /// 服务类型, Turn 服务本身是 STUN 和 TURN 的集合
    pub service_type: ServiceType,
    pub domain_name: String,
    pub port_info: String,
    /// 服务状态
    pub status: ServiceStatus,
    /// 服务描述
    pub description: Option<String>,
}

impl ServiceInfo {
    pub fn new(
        name: impl Into<String>,
        service_type: ServiceType,
        description: Option<String>,
        config: &ServerConfig,
    ) -> Self {
        let (port_info, domain_name) = match service_type {
            ServiceType::Sessions => match config.bind.http {
                Some(ref http_config) => (
                    http_config.port.to_string(),
                    format!("http://{}", http_config.domain_name),
                ),
                None => ("0".to_string(), "http://localhost".to_string()),
            },
            ServiceType::Turn => (
                config.bind.ice.port.to_string(),
                format!("turn:{}", config.bind.ice.domain_name),
            ),
            ServiceType::Stun => (
                config.bind.ice.port.to_string(),
                format!("stun:{}", config.bind.ice.domain_name),
            ),
        };

        Self {
            name: name.into(),
            service_type,
            port_info,
            domain_name,
            status: ServiceStatus::Unknown,
            description,
        }
    }

    /// 设置服务状态为运行中
    pub fn set_running(&mut self, url: Url) {
        self.status = ServiceStatus::Running(url.to_string());
        info!("Service '{}' is now running at {}", self.name, self.url());
    }

    /// 设置服务状态为错误
    pub fn set_error(&mut self, error: impl Into<String>) {
        let error_msg = error.into();
        error!("Service '{}' encountered error: {}", self.name, error_msg);
        self.status = ServiceStatus::Error(error_msg);
    }

    /// 检查服务是否正在运行
    pub fn is_running(&self) -> bool {
        matches!(self.status, ServiceStatus::Running(_))
    }

    /// 获取服务状态的 URL（如果是运行状态）
    pub fn url(&self) -> String {
        match &self.status {
            ServiceStatus::Running(url) => url.to_string(),
            _ => "N/A".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions() {
        let config = ServerConfig::default();
        let mut info = ServiceInfo::new("TURN Server", ServiceType::Turn, None, &config);
        assert_eq!(info.port_info, "3478");
        assert_eq!(info.url(), "N/A");

        info.set_running(Url::parse("turn:localhost:3478?transport=udp").unwrap());
        assert!(info.is_running());
        assert_eq!(info.url(), "turn:localhost:3478?transport=udp");

        info.set_error("bind failed");
        assert!(!info.is_running());
        assert_eq!(info.status, ServiceStatus::Error("bind failed".to_string()));
    }

    #[test]
    fn test_sessions_info_uses_http_bind() {
        let config = ServerConfig::default();
        let info = ServiceInfo::new("Sessions API", ServiceType::Sessions, None, &config);
        assert_eq!(info.port_info, "8080");
        assert_eq!(info.domain_name, "http://localhost");
    }
}
