//! 服务配置集合

use serde::{Deserialize, Serialize};

/// 所有服务的配置集合
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ServicesConfig {
    /// 会话凭据服务配置
    #[serde(default)]
    pub sessions: session::SessionServiceConfig,
}
