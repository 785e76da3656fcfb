//! 服务容器模块 - 封装不同类型的服务

use super::{HttpRouterService, IceService};
use super::{SessionsHttpService, TurnService};
use crate::service::info::ServiceInfo;
use axum::Router;
use url::Url;

/// 服务容器，用于封装不同类型的服务
#[derive(Debug)]
pub enum ServiceContainer {
    Sessions(SessionsHttpService),
    Turn(TurnService),
}

impl ServiceContainer {
    /// 创建会话 HTTP 服务容器
    pub fn sessions(service: SessionsHttpService) -> Self {
        Self::Sessions(service)
    }

    /// 创建TURN服务容器
    pub fn turn(service: TurnService) -> Self {
        Self::Turn(service)
    }

    pub fn info(&self) -> &ServiceInfo {
        match self {
            ServiceContainer::Sessions(service) => service.info(),
            ServiceContainer::Turn(service) => service.info(),
        }
    }

    pub fn is_http_router(&self) -> bool {
        matches!(self, ServiceContainer::Sessions(_))
    }

    /// 获取路由前缀（仅适用于 HTTP 路由服务）
    pub fn route_prefix(&self) -> Option<&str> {
        match self {
            ServiceContainer::Sessions(service) => Some(service.route_prefix()),
            ServiceContainer::Turn(_) => None,
        }
    }

    /// 构建路由器（仅适用于 HTTP 路由服务）
    pub async fn build_router(&mut self) -> Option<anyhow::Result<Router>> {
        match self {
            ServiceContainer::Sessions(service) => Some(service.build_router().await),
            ServiceContainer::Turn(_) => None,
        }
    }

    /// 服务启动回调（仅适用于 HTTP 路由服务）
    pub async fn on_start(&mut self, base_url: Url) -> Option<anyhow::Result<()>> {
        match self {
            ServiceContainer::Sessions(service) => Some(service.on_start(base_url).await),
            ServiceContainer::Turn(_) => None,
        }
    }

    /// 服务停止回调
    pub async fn stop(&mut self) -> anyhow::Result<()> {
        match self {
            ServiceContainer::Sessions(service) => service.on_stop().await,
            ServiceContainer::Turn(service) => service.stop().await,
        }
    }
}
