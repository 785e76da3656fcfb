//! 服务管理器模块 - 负责管理多个服务的生命周期

use super::{IceService, ServiceType};
use crate::service::container::ServiceContainer;
use crate::service::info::ServiceInfo;
use crate::service::trace::http_trace_layer;
use anyhow::Result;
use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use turn_server_common::ServerConfig;
use turn_server_common::metrics::{export_metrics, set_service_up};
use url::Url;

/// 服务管理器，负责管理多个服务的生命周期
#[derive(Debug)]
pub struct ServiceManager {
    /// 待启动的服务
    services: Vec<ServiceContainer>,
    /// 已启动、由管理器负责停止的 HTTP 服务
    http_services: Vec<ServiceContainer>,
    /// 已启动服务的信息快照
    service_infos: Vec<ServiceInfo>,
    shutdown_tx: tokio::sync::broadcast::Sender<()>,
    config: ServerConfig,
}

impl ServiceManager {
    /// 创建新的服务管理器
    pub fn new(config: ServerConfig, shutdown_tx: tokio::sync::broadcast::Sender<()>) -> Self {
        Self {
            services: Vec::new(),
            http_services: Vec::new(),
            service_infos: Vec::new(),
            shutdown_tx,
            config,
        }
    }

    /// 添加服务到管理器
    pub fn add_service(&mut self, service: ServiceContainer) {
        info!("Adding service '{}' to manager", service.info().name);
        self.services.push(service);
    }

    /// 已启动服务的信息
    pub fn service_infos(&self) -> &[ServiceInfo] {
        &self.service_infos
    }

    /// 启动所有服务
    ///
    /// 返回的每个句柄在对应服务退出时结束。
    pub async fn start_all(&mut self) -> Result<Vec<JoinHandle<()>>> {
        info!(
            "Starting {} services ({})",
            self.services.len(),
            self.services
                .iter()
                .map(|s| s.info().service_type.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );

        let services = std::mem::take(&mut self.services);
        let (http_services, ice_services): (Vec<_>, Vec<_>) =
            services.into_iter().partition(|s| s.is_http_router());

        let mut handle_futs = Vec::new();

        // 所有 HTTP 路由服务合并到一个监听端口
        if !http_services.is_empty() {
            handle_futs.push(self.start_http_services(http_services).await?);
        }

        for service in ice_services {
            handle_futs.push(self.start_ice_service(service).await?);
        }

        Ok(handle_futs)
    }

    /// 启动HTTP服务器，合并所有HTTP路由服务
    async fn start_http_services(
        &mut self,
        mut services: Vec<ServiceContainer>,
    ) -> Result<JoinHandle<()>> {
        let http_config = self.config.bind.http.clone().ok_or_else(|| {
            anyhow::anyhow!("bind.http is required to run HTTP services")
        })?;
        let bind_addr = http_config.bind_addr();

        let listener = tokio::net::TcpListener::bind(&bind_addr)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind to address '{bind_addr}': {e}"))?;
        let local_addr = listener.local_addr()?;
        let public_url = Url::parse(&format!(
            "http://{}:{}",
            http_config.domain_name,
            local_addr.port()
        ))
        .map_err(|e| anyhow::anyhow!("Failed to parse HTTP URL: {e}"))?;

        info!(
            "Starting HTTP server with {} route services (environment: {})",
            services.len(),
            self.config.env
        );

        let mut app = Router::new();

        for service in &mut services {
            let Some(route_prefix) = service.route_prefix().map(str::to_string) else {
                continue;
            };
            let service_name = service.info().name.clone();

            let Some(router_result) = service.build_router().await else {
                continue;
            };

            match router_result {
                Ok(router) => {
                    info!(
                        "Adding route '{}' for service '{}'",
                        route_prefix, service_name
                    );
                    app = app.nest(&route_prefix, router);

                    let mut service_url = public_url.clone();
                    service_url.set_path(&route_prefix);
                    if let Some(Err(e)) = service.on_start(service_url).await {
                        error!("Failed to start service '{}': {:?}", service_name, e);
                    }
                    set_service_up(&service_name, service.info().is_running());
                    self.service_infos.push(service.info().clone());
                }
                Err(e) => {
                    error!(
                        "Failed to build router for service '{}': {:?}",
                        service_name, e
                    );
                    return Err(e);
                }
            }
        }
        self.http_services = services;

        info!("Adding /metrics endpoint for Prometheus");
        app = app
            .route("/metrics", axum::routing::get(metrics_handler))
            .layer(http_trace_layer())
            .layer(CorsLayer::permissive());

        info!("HTTP server listening on {}", local_addr);

        let shutdown_tx = self.shutdown_tx.clone();
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let handle = tokio::spawn(async move {
            let server = axum::serve(
                listener,
                app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
            )
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
                info!("HTTP server received shutdown signal");
            });
            if let Err(e) = server.await {
                error!("HTTP server error: {}", e);
                let _ = shutdown_tx.send(());
            }
            info!("HTTP server stopped");
        });

        Ok(handle)
    }

    /// 启动单个ICE服务
    async fn start_ice_service(&mut self, service: ServiceContainer) -> Result<JoinHandle<()>> {
        let mut turn_service = match service {
            ServiceContainer::Turn(s) => s,
            other => {
                let name = other.info().name.clone();
                error!("Invalid service type for ICE service: {}", name);
                return Err(anyhow::anyhow!("Invalid service type for ICE service: {name}"));
            }
        };

        let shutdown_rx = self.shutdown_tx.subscribe();
        let shutdown_tx = self.shutdown_tx.clone();
        let (tx, rx) = tokio::sync::oneshot::channel::<ServiceInfo>();

        let handle = tokio::spawn(async move {
            let name = turn_service.info().name.clone();
            if let Err(e) = turn_service.start(shutdown_rx, tx).await {
                error!("Failed to start TURN service: {:?}", e);
                let _ = shutdown_tx.send(());
            }
            set_service_up(&name, false);
        });

        // 发送端在启动失败时被丢弃
        let info = rx
            .await
            .map_err(|_| anyhow::anyhow!("TURN service failed to start"))?;
        set_service_up(&info.name, true);

        // TURN 服务同时提供 STUN
        let mut stun_info = ServiceInfo::new("STUN Server", ServiceType::Stun, None, &self.config);
        stun_info.port_info = info.port_info.clone();
        stun_info.set_running(
            Url::parse(&format!(
                "stun:{}:{}",
                self.config.bind.ice.domain_name, info.port_info
            ))
            .map_err(|e| anyhow::anyhow!("Failed to parse STUN URL: {e}"))?,
        );

        self.service_infos.push(info);
        self.service_infos.push(stun_info);
        Ok(handle)
    }

    /// Stop all services
    pub async fn stop_all(&mut self) -> Result<()> {
        info!("Stopping all services");

        let _ = self.shutdown_tx.send(());
        for service in &mut self.http_services {
            let name = service.info().name.clone();
            if let Err(e) = service.stop().await {
                error!("Failed to stop service '{}': {:?}", name, e);
            }
            set_service_up(&name, false);
        }

        info!("All services stopped");
        Ok(())
    }
}

/// Prometheus metrics endpoint handler
async fn metrics_handler() -> Response {
    match export_metrics() {
        Ok(body) => body.into_response(),
        Err(e) => {
            error!("Failed to export metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to export metrics").into_response()
        }
    }
}
