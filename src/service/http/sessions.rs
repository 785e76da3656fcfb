//! 会话凭据 HTTP 服务

use crate::service::ServiceType;
use crate::service::{HttpRouterService, info::ServiceInfo};
use anyhow::Result;
use async_trait::async_trait;
use axum::Router;
use session::{CredentialService, create_router};
use std::sync::Arc;
use tracing::info;
use turn_server_common::ServerConfig;

/// 会话 API 挂载前缀
pub const SESSIONS_ROUTE_PREFIX: &str = "/v1";

/// 会话凭据 HTTP 服务
#[derive(Debug)]
pub struct SessionsHttpService {
    info: ServiceInfo,
    credentials: Arc<CredentialService>,
}

impl SessionsHttpService {
    pub fn new(config: &ServerConfig, credentials: Arc<CredentialService>) -> Self {
        Self {
            info: ServiceInfo::new(
                "Sessions API",
                ServiceType::Sessions,
                Some("Issues per-user TURN long-term credentials".to_string()),
                config,
            ),
            credentials,
        }
    }
}

#[async_trait]
impl HttpRouterService for SessionsHttpService {
    fn info(&self) -> &ServiceInfo {
        &self.info
    }

    fn info_mut(&mut self) -> &mut ServiceInfo {
        &mut self.info
    }

    async fn build_router(&mut self) -> Result<Router> {
        info!(
            "Building sessions router (backend={})",
            self.credentials.backend_name()
        );
        Ok(create_router(self.credentials.clone()))
    }

    fn route_prefix(&self) -> &str {
        SESSIONS_ROUTE_PREFIX
    }
}
