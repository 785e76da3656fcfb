//! 密钥存储后端抽象接口
//!
//! 所有方法都是同步的：TURN 服务器在每次认证时同步回调 `find`，
//! 临界区只包含单次 map 操作，不允许在持锁期间 await。

use crate::error::SessionResult;
use std::fmt::Debug;
use std::sync::Arc;

/// 认证密钥（不透明字节，长期凭据派生结果）
///
/// 使用 `Arc<[u8]>`，查询时只增加引用计数而不复制字节。
pub type AuthKey = Arc<[u8]>;

/// 密钥存储后端抽象接口
pub trait KeyStoreBackend: Send + Sync + Debug {
    /// 按用户 ID 查询密钥
    ///
    /// 并发的 `find` 之间互不阻塞。
    fn find(&self, user_id: &str) -> Option<AuthKey>;

    /// 插入或覆盖密钥
    fn save(&self, user_id: &str, key: AuthKey) -> SessionResult<()>;

    /// 原子的条件插入
    ///
    /// # Returns
    /// * `Ok(())` - 用户原本不存在，已写入
    /// * `Err(SessionError::Conflict)` - 用户已存在，原有密钥保持不变
    fn insert_if_absent(&self, user_id: &str, key: AuthKey) -> SessionResult<()>;

    /// 删除密钥
    ///
    /// 用户不存在时返回 `SessionError::NotFound`。
    fn delete(&self, user_id: &str) -> SessionResult<()>;

    /// 当前存储的条目数
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
