//! TURN服务实现

use crate::service::{IceService, ServiceStatus, ServiceType, info::ServiceInfo};
use anyhow::Result;
use async_trait::async_trait;
use session::CredentialService;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tracing::{error, info};
use turn_server_common::ServerConfig;
use url::Url;

/// TURN服务实现
#[derive(Debug)]
pub struct TurnService {
    info: ServiceInfo,
    config: ServerConfig,
    credentials: Arc<CredentialService>,
    socket: Option<Arc<UdpSocket>>,
}

impl TurnService {
    pub fn new(config: ServerConfig, credentials: Arc<CredentialService>) -> Self {
        Self {
            info: ServiceInfo::new(
                "TURN Server",
                ServiceType::Turn,
                Some("TURN server with built-in STUN support for WebRTC connectivity".to_string()),
                &config,
            ),
            config,
            credentials,
            socket: None,
        }
    }
}

#[async_trait]
impl IceService for TurnService {
    fn info(&self) -> &ServiceInfo {
        &self.info
    }

    fn info_mut(&mut self) -> &mut ServiceInfo {
        &mut self.info
    }

    async fn start(
        &mut self,
        mut shutdown_rx: tokio::sync::broadcast::Receiver<()>,
        oneshot_tx: tokio::sync::oneshot::Sender<ServiceInfo>,
    ) -> Result<()> {
        let addr = self.config.bind.ice.bind_addr();
        info!("Starting TURN service on {}", addr);

        let relay_ports = match self.config.turn.relay_ports() {
            Ok(ports) => ports,
            Err(e) => {
                self.info.set_error(e.to_string());
                return Err(e.into());
            }
        };

        let socket = match UdpSocket::bind(&addr).await {
            Ok(socket) => Arc::new(socket),
            Err(e) => {
                let error_msg = format!("Failed to bind TURN service to {addr}: {e}");
                self.info.set_error(&error_msg);
                return Err(anyhow::anyhow!(error_msg));
            }
        };
        let local_addr = socket.local_addr()?;
        info!("TURN service listening on: {}", local_addr);
        self.socket = Some(socket.clone());

        let auth_handler = Arc::new(turn::Authenticator::new(self.credentials.clone()));

        let turn_server = match turn::create_turn_server(
            socket,
            &self.config.turn.advertised_ip,
            &self.config.turn.realm,
            relay_ports,
            auth_handler,
        )
        .await
        {
            Ok(server) => server,
            Err(e) => {
                let error_msg = format!("Failed to start TURN service: {e}");
                self.info.set_error(&error_msg);
                return Err(anyhow::anyhow!(error_msg));
            }
        };

        // 端口可能是 0（由系统分配），回报实际端口
        self.info.port_info = local_addr.port().to_string();
        let url = Url::parse(&format!(
            "turn:{}:{}?transport=udp",
            self.config.bind.ice.domain_name,
            local_addr.port()
        ))?;
        self.info.set_running(url);
        oneshot_tx
            .send(self.info.clone())
            .map_err(|_| anyhow::anyhow!("Failed to send TURN service info"))?;
        info!("TURN service started successfully");

        let _ = shutdown_rx.recv().await;
        info!("TURN service received shutdown signal");

        if let Err(e) = turn::shutdown_turn_server(&turn_server).await {
            error!("Error shutting down TURN server: {}", e);
        }

        self.stop().await
    }

    async fn stop(&mut self) -> Result<()> {
        info!("Stopping TURN service");

        self.socket = None;
        self.info.status = ServiceStatus::Unknown;

        info!("TURN service stopped");
        Ok(())
    }
}
