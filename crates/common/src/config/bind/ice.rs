use serde::{Deserialize, Serialize};

/// ICE 服务绑定配置
///
/// 用于 TURN（内置 STUN）服务的 UDP 网络配置。
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct IceBindConfig {
    /// 域名
    ///
    /// ICE 服务的域名标识，用于生成 turn:/stun: URL。
    pub domain_name: String,

    /// 绑定 IP 地址
    pub ip: String,

    /// 绑定端口
    ///
    /// TURN 服务监听的 UDP 端口。标准端口为 3478。
    pub port: u16,
}

impl IceBindConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.ip, self.port)
    }
}

impl Default for IceBindConfig {
    fn default() -> Self {
        Self {
            domain_name: "localhost".to_string(),
            ip: "0.0.0.0".to_string(),
            port: 3478,
        }
    }
}
