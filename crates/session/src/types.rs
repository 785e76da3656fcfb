//! 会话服务数据类型定义

use serde::{Deserialize, Serialize};

/// 创建会话请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    /// 用户 ID，同时作为 TURN 用户名
    pub user_id: String,
    /// 共享密钥，参与长期凭据派生
    pub key: String,
}

/// 会话统计
///
/// 两个计数器分别读取，并发更新下允许轻微偏差。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatistics {
    pub started: u64,
    pub ended: u64,
}

/// 通用成功响应
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}
