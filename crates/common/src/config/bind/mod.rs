pub mod http;
pub mod ice;

pub use crate::config::bind::http::HttpBindConfig;
pub use crate::config::bind::ice::IceBindConfig;
use serde::{Deserialize, Serialize};

/// 网络绑定配置
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BindConfig {
    /// HTTP 服务绑定配置（会话 API 启用时必需）
    #[serde(default)]
    pub http: Option<HttpBindConfig>,

    /// ICE 服务绑定配置
    ///
    /// 用于 TURN 服务的 UDP 绑定配置。
    #[serde(default)]
    pub ice: IceBindConfig,
}

impl Default for BindConfig {
    fn default() -> Self {
        Self {
            http: Some(HttpBindConfig::default()),
            ice: IceBindConfig::default(),
        }
    }
}
