//! 会话服务错误定义

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// 会话服务错误类型
///
/// 密钥存储返回的错误原样穿过 `CredentialService` 抛给 HTTP 边界层，
/// 由 `IntoResponse` 统一映射为状态码。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// 该用户已存在会话凭据
    #[error("Session already exists for user '{user_id}'")]
    Conflict { user_id: String },

    /// 用户不存在
    #[error("No such user: '{user_id}'")]
    NotFound { user_id: String },

    /// 存储后端错误
    #[error("Storage error: {0}")]
    Storage(String),

    /// 无效的请求参数
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl SessionError {
    pub fn conflict(user_id: impl Into<String>) -> Self {
        Self::Conflict {
            user_id: user_id.into(),
        }
    }

    pub fn not_found(user_id: impl Into<String>) -> Self {
        Self::NotFound {
            user_id: user_id.into(),
        }
    }

    /// 对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_message = match &self {
            SessionError::Storage(_) => {
                // 不向客户端暴露内部错误详情
                tracing::error!("Internal error: {:?}", self);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": error_message,
            "code": status.as_u16()
        }));

        (status, body).into_response()
    }
}

/// 会话服务结果类型别名
pub type SessionResult<T> = Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            SessionError::conflict("alice").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            SessionError::not_found("alice").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            SessionError::InvalidRequest("empty".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            SessionError::Storage("poisoned".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_message_contains_user() {
        let err = SessionError::conflict("user-1");
        assert!(err.to_string().contains("user-1"));
    }
}
