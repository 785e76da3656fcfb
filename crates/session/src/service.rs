//! 会话凭据服务
//!
//! 在密钥存储之上实现业务规则：
//! 1. 使用 TURN 长期凭据算法派生密钥：MD5(user_id:realm:shared_secret)
//! 2. 每个用户最多一个会话，重复创建返回 Conflict，不覆盖已有密钥
//! 3. 原子计数器统计已开始/已结束的会话

use crate::config::SessionServiceConfig;
use crate::error::{SessionError, SessionResult};
use crate::storage::{AuthKey, KeyStorage};
use crate::types::SessionStatistics;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

/// 会话凭据服务
///
/// 进程启动时构造一次，以 `Arc<CredentialService>` 共享给 HTTP 层和 TURN 认证回调。
#[derive(Debug)]
pub struct CredentialService {
    realm: String,
    storage: KeyStorage,
    started: AtomicU64,
    ended: AtomicU64,
}

impl CredentialService {
    pub fn new(realm: impl Into<String>, storage: KeyStorage) -> Self {
        let realm = realm.into();
        info!(
            "Credential service initialized: realm={}, backend={}",
            realm,
            storage.backend_name()
        );
        Self {
            realm,
            storage,
            started: AtomicU64::new(0),
            ended: AtomicU64::new(0),
        }
    }

    /// 从配置创建服务
    pub fn from_config(config: &SessionServiceConfig, realm: &str) -> Self {
        Self::new(realm, KeyStorage::from_backend(config.backend))
    }

    pub fn realm(&self) -> &str {
        &self.realm
    }

    pub fn backend_name(&self) -> &'static str {
        self.storage.backend_name()
    }

    /// 派生长期凭据密钥
    pub fn derive_key(&self, user_id: &str, shared_secret: &str) -> Vec<u8> {
        turn_crate::auth::generate_auth_key(user_id, &self.realm, shared_secret)
    }

    /// 为用户创建会话
    ///
    /// 密钥在锁外派生，写入使用原子的条件插入，
    /// 并发的重复请求只有一个成功，其余返回 `SessionError::Conflict`。
    pub fn create_session(&self, user_id: &str, shared_secret: &str) -> SessionResult<()> {
        if user_id.trim().is_empty() {
            return Err(SessionError::InvalidRequest(
                "user_id must not be empty".to_string(),
            ));
        }
        if shared_secret.is_empty() {
            return Err(SessionError::InvalidRequest(
                "key must not be empty".to_string(),
            ));
        }

        let key = AuthKey::from(self.derive_key(user_id, shared_secret));

        if let Err(e) = self.storage.insert_if_absent(user_id, key) {
            warn!("Failed to create session: user_id={}, error={}", user_id, e);
            return Err(e);
        }

        self.started.fetch_add(1, Ordering::Relaxed);
        debug!("Session created: user_id={}", user_id);
        Ok(())
    }

    /// TURN 认证回调使用的密钥查询
    ///
    /// `realm` 和 `src_addr` 仅用于匹配 TURN 回调签名，不参与查询。
    #[inline]
    pub fn lookup_key(
        &self,
        user_id: &str,
        _realm: &str,
        _src_addr: SocketAddr,
    ) -> Option<AuthKey> {
        self.storage.find(user_id)
    }

    /// 删除用户会话
    pub fn remove_session(&self, user_id: &str) -> SessionResult<()> {
        self.storage.delete(user_id)?;
        self.ended.fetch_add(1, Ordering::Relaxed);
        debug!("Session removed: user_id={}", user_id);
        Ok(())
    }

    /// 会话统计快照
    pub fn statistics(&self) -> SessionStatistics {
        SessionStatistics {
            started: self.started.load(Ordering::Relaxed),
            ended: self.ended.load(Ordering::Relaxed),
        }
    }

    /// 当前持有凭据的用户数
    pub fn active_sessions(&self) -> usize {
        self.storage.len()
    }
}
