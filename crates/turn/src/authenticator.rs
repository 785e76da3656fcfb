//! TURN 认证器
//!
//! 把 TURN 服务器的同步认证回调桥接到会话凭据服务

use prometheus::IntCounter;
use session::CredentialService;
use session::metrics::AUTH_LOOKUPS;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, warn};
use turn_crate::Error;
use turn_crate::auth::AuthHandler;

/// TURN 认证器
///
/// 每个 TURN 请求都会同步调用 `auth_handle`，这里只做一次存储查找。
pub struct Authenticator {
    credentials: Arc<CredentialService>,
    hits: IntCounter,
    misses: IntCounter,
}

impl Authenticator {
    pub fn new(credentials: Arc<CredentialService>) -> Self {
        tracing::info!(
            "TURN 认证器初始化完成 (realm={}, backend={})",
            credentials.realm(),
            credentials.backend_name()
        );
        Self {
            credentials,
            hits: AUTH_LOOKUPS.with_label_values(&["hit"]),
            misses: AUTH_LOOKUPS.with_label_values(&["miss"]),
        }
    }
}

impl AuthHandler for Authenticator {
    fn auth_handle(
        &self,
        username: &str,
        realm: &str,
        src_addr: SocketAddr,
    ) -> Result<Vec<u8>, Error> {
        debug!(
            "Processing TURN authentication request: username={}, realm={}, src={}",
            username, realm, src_addr
        );

        match self.credentials.lookup_key(username, realm, src_addr) {
            Some(key) => {
                self.hits.inc();
                Ok(key.to_vec())
            }
            None => {
                self.misses.inc();
                warn!(
                    "TURN authentication rejected, no session: username={}, src={}",
                    username, src_addr
                );
                Err(Error::Other(format!("no such user: {username}")))
            }
        }
    }
}
