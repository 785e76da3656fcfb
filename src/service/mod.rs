//! # Service Management Abstraction
//!
//! 管理会话 HTTP API 和 TURN 中继的生命周期
//!
//! ## 核心概念
//!
//! - `HttpRouterService`: HTTP路由服务的核心 trait，提供 axum 路由器
//! - `IceService`: ICE服务的核心 trait，独立的 UDP 服务器
//! - `ServiceInfo`: 服务的基本信息
//! - `ServiceManager`: 服务管理器，负责管理多个服务的生命周期

pub mod container;
pub mod http;
pub mod ice;
pub mod info;
pub mod manager;
pub mod trace;

use anyhow::Result;
use async_trait::async_trait;
use axum::Router;
use info::ServiceInfo;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use strum::Display;
use tracing::info;
use url::Url;

pub use http::SessionsHttpService;
pub use ice::TurnService;

pub use container::ServiceContainer;
pub use info::ServiceStatus;
pub use manager::ServiceManager;

/// 服务类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Display, PartialEq, Eq)]
pub enum ServiceType {
    Sessions,
    Turn,
    Stun,
}

/// HTTP路由服务的核心 trait - 为 axum 提供路由器
#[async_trait]
pub trait HttpRouterService: Send + Sync + Debug {
    /// 获取服务信息
    fn info(&self) -> &ServiceInfo;

    /// 获取可变的服务信息
    fn info_mut(&mut self) -> &mut ServiceInfo;

    /// 构建axum路由器
    async fn build_router(&mut self) -> Result<Router>;

    /// 服务启动回调（路由器已构建并启动后调用）
    async fn on_start(&mut self, base_url: Url) -> Result<()> {
        self.info_mut().set_running(base_url);
        Ok(())
    }

    /// 服务停止回调
    async fn on_stop(&mut self) -> Result<()> {
        info!("HTTP router service '{}' stopped", self.info().name);
        self.info_mut().status = ServiceStatus::Unknown;
        Ok(())
    }

    /// 获取路由前缀（如 "/v1"）
    fn route_prefix(&self) -> &str;
}

/// ICE服务的核心 trait - 独立的 UDP 服务器
#[async_trait]
pub trait IceService: Send + Sync + Debug {
    /// 获取服务信息
    fn info(&self) -> &ServiceInfo;

    /// 获取可变的服务信息
    fn info_mut(&mut self) -> &mut ServiceInfo;

    /// 启动ICE服务，运行到收到关闭信号为止
    ///
    /// 绑定成功后通过 `oneshot_tx` 回报服务信息。
    async fn start(
        &mut self,
        shutdown_rx: tokio::sync::broadcast::Receiver<()>,
        oneshot_tx: tokio::sync::oneshot::Sender<ServiceInfo>,
    ) -> Result<()>;

    /// 停止ICE服务
    async fn stop(&mut self) -> Result<()> {
        info!("ICE service '{}' stopped", self.info().name);
        self.info_mut().status = ServiceStatus::Unknown;
        Ok(())
    }
}
