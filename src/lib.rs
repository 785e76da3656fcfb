//! # turn-server
//!
//! TURN 中继服务器，以及为其签发每用户长期凭据的 HTTP 会话服务

pub mod service;

pub use service::{ServiceContainer, ServiceManager};
pub use turn_server_common::config::ServerConfig;
