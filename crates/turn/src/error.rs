//! TURN 服务错误类型

use thiserror::Error;

/// TURN 服务错误枚举
#[derive(Error, Debug)]
pub enum TurnError {
    /// 服务器启动失败
    #[error("Failed to start TURN server: {reason}")]
    ServerStartFailed { reason: String },

    /// 服务器关闭失败
    #[error("Failed to shutdown TURN server: {reason}")]
    ServerShutdownFailed { reason: String },

    /// 配置错误
    #[error("Configuration error: {field} = {value}")]
    Configuration { field: String, value: String },

    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 通用错误
    #[error("General error: {message}")]
    General { message: String },
}

/// TURN 服务专用的 Result 类型
pub type Result<T> = std::result::Result<T, TurnError>;

impl TurnError {
    /// 创建通用错误
    pub fn general(message: impl Into<String>) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// 创建配置错误
    pub fn config_error(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Configuration {
            field: field.into(),
            value: value.into(),
        }
    }
}

impl From<anyhow::Error> for TurnError {
    fn from(err: anyhow::Error) -> Self {
        Self::general(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = TurnError::general("test error");
        assert!(err.to_string().contains("test error"));

        let err = TurnError::config_error("relay_port_range", "9-1");
        assert_eq!(err.to_string(), "Configuration error: relay_port_range = 9-1");
    }

    #[test]
    fn test_from_anyhow() {
        let err: TurnError = anyhow::anyhow!("boom").into();
        assert!(matches!(err, TurnError::General { .. }));
    }
}
