//! 会话密钥存储模块
//!
//! # 设计
//!
//! - `KeyStoreBackend` trait 定义统一的同步接口
//! - `KeyStorage` enum 封装不同的后端实现
//! - 通过 `StoreBackend` 配置选择后端
//!
//! 所有状态都在进程内存中，重启后丢失。

pub mod backend;
pub mod memory;
pub mod sharded;

use crate::error::SessionResult;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use backend::{AuthKey, KeyStoreBackend};
pub use memory::MemoryBackend;
pub use sharded::ShardedBackend;

/// 存储后端类型枚举
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// 单把读写锁保护的 HashMap
    #[default]
    Memory,
    /// DashMap 分片存储
    Sharded,
}

/// 密钥存储统一接口
///
/// 使用 enum 分发而不是 trait object，克隆时只复制 `Arc`。
#[derive(Clone, Debug)]
pub enum KeyStorage {
    Memory(Arc<MemoryBackend>),
    Sharded(Arc<ShardedBackend>),
}

impl Default for KeyStorage {
    fn default() -> Self {
        Self::from_backend(StoreBackend::default())
    }
}

impl KeyStorage {
    /// 按后端类型创建空存储
    pub fn from_backend(backend: StoreBackend) -> Self {
        match backend {
            StoreBackend::Memory => Self::Memory(Arc::new(MemoryBackend::new())),
            StoreBackend::Sharded => Self::Sharded(Arc::new(ShardedBackend::new())),
        }
    }

    fn backend(&self) -> &dyn KeyStoreBackend {
        match self {
            Self::Memory(b) => b.as_ref(),
            Self::Sharded(b) => b.as_ref(),
        }
    }

    pub fn find(&self, user_id: &str) -> Option<AuthKey> {
        self.backend().find(user_id)
    }

    pub fn save(&self, user_id: &str, key: AuthKey) -> SessionResult<()> {
        self.backend().save(user_id, key)
    }

    pub fn insert_if_absent(&self, user_id: &str, key: AuthKey) -> SessionResult<()> {
        self.backend().insert_if_absent(user_id, key)
    }

    pub fn delete(&self, user_id: &str) -> SessionResult<()> {
        self.backend().delete(user_id)
    }

    pub fn len(&self) -> usize {
        self.backend().len()
    }

    pub fn is_empty(&self) -> bool {
        self.backend().is_empty()
    }

    /// 获取后端类型名称
    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Sharded(_) => "sharded",
        }
    }
}
