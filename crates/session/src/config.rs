//! 会话服务配置

use crate::storage::StoreBackend;
use serde::{Deserialize, Serialize};

/// 会话服务配置
///
/// Service enable/disable is controlled by the bitmask in ServerConfig.enable.
/// The ENABLE_SESSIONS bit (bit 0) must be set to expose the HTTP API.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct SessionServiceConfig {
    /// 密钥存储后端
    ///
    /// - "memory": 单把读写锁保护的 HashMap（默认）
    /// - "sharded": DashMap 分片存储，适合高并发写入
    #[serde(default)]
    pub backend: StoreBackend,
}
