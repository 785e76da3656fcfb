use super::error::ConfigError;
use serde::{Deserialize, Serialize};

/// TURN 服务配置
///
/// TURN 中继服务的专用配置参数。
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TurnConfig {
    /// 公网 IP 地址
    ///
    /// TURN 服务对外宣告的中继地址。客户端通过此地址进行中继通信。
    /// 必须是真实可路由的 IP，不能使用 "0.0.0.0"。
    pub advertised_ip: String,

    /// 公网端口
    ///
    /// TURN 服务对外宣告的端口号，通常与绑定端口相同。
    pub advertised_port: u16,

    /// 中继端口范围
    ///
    /// 格式：开始端口-结束端口，如 "49152-65535"。
    pub relay_port_range: String,

    /// TURN 认证域
    ///
    /// 同时用于 TURN 协议认证和会话密钥派生，两处必须一致。
    pub realm: String,
}

impl TurnConfig {
    /// 解析中继端口范围
    pub fn relay_ports(&self) -> Result<(u16, u16), ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            field: "turn.relay_port_range".to_string(),
            value: self.relay_port_range.clone(),
        };

        let (min, max) = self.relay_port_range.split_once('-').ok_or_else(invalid)?;
        let min: u16 = min.trim().parse().map_err(|_| invalid())?;
        let max: u16 = max.trim().parse().map_err(|_| invalid())?;
        if min == 0 || min > max {
            return Err(invalid());
        }
        Ok((min, max))
    }
}

impl Default for TurnConfig {
    fn default() -> Self {
        Self {
            advertised_ip: "127.0.0.1".to_string(),
            advertised_port: 3478,
            relay_port_range: "49152-65535".to_string(),
            realm: "turn-server.local".to_string(),
        }
    }
}
