//! TURN 会话凭据服务
//!
//! 提供以下功能：
//! 1. 接收会话注册，按 TURN 长期凭据算法从共享密钥派生认证密钥
//! 2. 并发安全的密钥存储，供 TURN 服务器认证回调同步查询
//! 3. 每个用户最多一个会话，重复注册返回 409
//! 4. 会话统计（started / ended）

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod service;
pub mod storage;
pub mod types;

pub use config::SessionServiceConfig;
pub use error::{SessionError, SessionResult};
pub use handlers::{SessionState, create_router};
pub use metrics::register_session_metrics;
pub use service::CredentialService;
pub use storage::{AuthKey, KeyStorage, KeyStoreBackend, StoreBackend};
pub use types::{CreateSessionRequest, SessionStatistics, StatusResponse};
