//! TURN 服务器实现
//!
//! 基于 webrtc-rs 的 TURN 中继服务器，认证密钥来自会话凭据服务

mod authenticator;
pub mod error;

pub use authenticator::Authenticator;
pub use error::TurnError;

use std::net::IpAddr;
use std::str::FromStr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tracing::*;
use turn_crate::auth::AuthHandler;
use turn_crate::relay::relay_range::*;
use turn_crate::server::config::*;
use turn_crate::server::*;
use webrtc_util::vnet::net::*;

const CHANNEL_BIND_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(600);
const RELAY_MAX_RETRIES: u16 = 10;

/// 创建并启动 TURN 服务器
///
/// `relay_ports` 为闭区间 `(min, max)`。
pub async fn create_turn_server(
    socket: Arc<UdpSocket>,
    advertised_ip: &str,
    realm: &str,
    relay_ports: (u16, u16),
    auth_handler: Arc<dyn AuthHandler + Send + Sync>,
) -> error::Result<Server> {
    info!("Creating TURN server with advertised IP: {}", advertised_ip);

    let local_addr = match socket.local_addr() {
        Ok(addr) => addr.ip().to_string(),
        Err(e) => {
            error!("Failed to get local address from socket: {}", e);
            "0.0.0.0".to_string()
        }
    };

    let relay_ip = IpAddr::from_str(advertised_ip).map_err(|e| {
        error!("Invalid advertised IP address '{}': {}", advertised_ip, e);
        TurnError::config_error("advertised_ip", advertised_ip)
    })?;

    let (min_port, max_port) = relay_ports;
    if min_port == 0 || min_port > max_port {
        error!("Invalid relay port range {}-{}", min_port, max_port);
        return Err(TurnError::config_error(
            "relay_port_range",
            format!("{min_port}-{max_port}"),
        ));
    }

    info!(
        "TURN server will use local address: {}, relay ports {}-{}",
        local_addr, min_port, max_port
    );

    let server_config = ServerConfig {
        conn_configs: vec![ConnConfig {
            conn: socket,
            relay_addr_generator: Box::new(RelayAddressGeneratorRanges {
                relay_address: relay_ip,
                min_port,
                max_port,
                max_retries: RELAY_MAX_RETRIES,
                address: local_addr,
                net: Arc::new(Net::new(None)),
            }),
        }],
        realm: realm.to_string(),
        auth_handler,
        channel_bind_timeout: CHANNEL_BIND_TIMEOUT,
        alloc_close_notify: None,
    };

    let server = Server::new(server_config).await.map_err(|e| {
        error!("Failed to create TURN server: {e}");
        TurnError::ServerStartFailed {
            reason: e.to_string(),
        }
    })?;

    info!("TURN server created successfully (includes STUN functionality)");
    Ok(server)
}

/// 关闭 TURN 服务器
pub async fn shutdown_turn_server(server: &Server) -> error::Result<()> {
    info!("Shutting down TURN server");

    if let Err(e) = server.close().await {
        error!("Error while closing TURN server: {e}");
        return Err(TurnError::ServerShutdownFailed {
            reason: format!("Failed to close TURN server: {e}"),
        });
    }

    info!("TURN server has been shut down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use session::{CredentialService, KeyStorage};
    use tokio::net::UdpSocket;

    const RELAY_PORTS: (u16, u16) = (50000, 50100);

    fn auth_handler() -> Arc<dyn AuthHandler + Send + Sync> {
        let credentials = Arc::new(CredentialService::new("test.realm", KeyStorage::default()));
        Arc::new(Authenticator::new(credentials))
    }

    #[tokio::test]
    async fn test_create_turn_server() -> anyhow::Result<()> {
        let socket = Arc::new(UdpSocket::bind("127.0.0.1:0").await?);

        let server = create_turn_server(
            socket,
            "127.0.0.1",
            "test.realm",
            RELAY_PORTS,
            auth_handler(),
        )
        .await?;

        shutdown_turn_server(&server).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_public_ip() {
        let socket = Arc::new(UdpSocket::bind("127.0.0.1:0").await.unwrap());

        let result = create_turn_server(
            socket,
            "invalid.ip.address",
            "test.realm",
            RELAY_PORTS,
            auth_handler(),
        )
        .await;

        assert!(matches!(result, Err(TurnError::Configuration { .. })));
    }

    #[tokio::test]
    async fn test_invalid_relay_range() {
        let socket = Arc::new(UdpSocket::bind("127.0.0.1:0").await.unwrap());

        let result = create_turn_server(
            socket,
            "127.0.0.1",
            "test.realm",
            (60000, 50000),
            auth_handler(),
        )
        .await;

        assert!(
            matches!(result, Err(TurnError::Configuration { ref field, .. }) if field == "relay_port_range")
        );
    }
}
