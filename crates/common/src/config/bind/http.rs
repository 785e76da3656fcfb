use serde::{Deserialize, Serialize};

/// HTTP 服务绑定配置
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HttpBindConfig {
    /// 域名
    ///
    /// 服务绑定的域名，用于生成对外 URL。
    pub domain_name: String,

    /// 绑定 IP 地址
    ///
    /// 服务实际绑定的网络接口 IP 地址。
    /// 会话 API 只应对内网开放，通常使用 "127.0.0.1" 或内网地址。
    pub ip: String,

    /// 绑定端口
    pub port: u16,
}

impl HttpBindConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.ip, self.port)
    }

    /// 是否只绑定在回环地址
    pub fn is_loopback(&self) -> bool {
        self.ip
            .parse::<std::net::IpAddr>()
            .map(|ip| ip.is_loopback())
            .unwrap_or(false)
    }
}

impl Default for HttpBindConfig {
    fn default() -> Self {
        Self {
            domain_name: "localhost".to_string(),
            ip: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}
