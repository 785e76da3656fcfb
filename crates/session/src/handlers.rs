//! 会话服务 HTTP 处理器

use crate::{
    error::SessionError,
    metrics::{SESSIONS_CREATED, SESSIONS_REMOVED, observe_request},
    service::CredentialService,
    types::{CreateSessionRequest, SessionStatistics, StatusResponse},
};
use axum::{
    Router,
    extract::{Json, Path, State, rejection::JsonRejection},
    routing::{delete, get, post},
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// 会话服务共享状态
pub type SessionState = Arc<CredentialService>;

/// 创建会话服务的路由
pub fn create_router(state: SessionState) -> Router {
    Router::new()
        .route("/sessions", post(create_session_handler))
        .route("/sessions/statistics", get(statistics_handler))
        .route("/sessions/{user_id}", delete(remove_session_handler))
        .route("/health", get(health_check_handler))
        .with_state(state)
}

fn status_of<T>(result: &Result<T, SessionError>) -> u16 {
    match result {
        Ok(_) => 200,
        Err(e) => e.status_code().as_u16(),
    }
}

async fn create_session_handler(
    State(service): State<SessionState>,
    payload: Result<Json<CreateSessionRequest>, JsonRejection>,
) -> Result<Json<StatusResponse>, SessionError> {
    let start_time = Instant::now();

    let result = payload
        .map_err(|e| {
            SessionError::InvalidRequest(format!("failed to parse request body: {}", e.body_text()))
        })
        .and_then(|Json(request)| {
            info!("Received session request for user_id: {}", request.user_id);
            service.create_session(&request.user_id, &request.key)
        });

    let outcome = match &result {
        Ok(()) => "ok",
        Err(SessionError::Conflict { .. }) => "conflict",
        Err(SessionError::InvalidRequest(_)) => "invalid",
        Err(_) => "error",
    };
    SESSIONS_CREATED.with_label_values(&[outcome]).inc();
    observe_request(
        "POST",
        "/sessions",
        status_of(&result),
        start_time.elapsed().as_secs_f64(),
    );

    result.map(|()| Json(StatusResponse::ok()))
}

async fn statistics_handler(State(service): State<SessionState>) -> Json<SessionStatistics> {
    let start_time = Instant::now();
    let stats = service.statistics();
    observe_request(
        "GET",
        "/sessions/statistics",
        200,
        start_time.elapsed().as_secs_f64(),
    );
    Json(stats)
}

async fn remove_session_handler(
    State(service): State<SessionState>,
    Path(user_id): Path<String>,
) -> Result<Json<StatusResponse>, SessionError> {
    let start_time = Instant::now();
    info!("Received session removal for user_id: {}", user_id);

    let result = service.remove_session(&user_id);
    if result.is_ok() {
        SESSIONS_REMOVED.inc();
    }
    observe_request(
        "DELETE",
        "/sessions",
        status_of(&result),
        start_time.elapsed().as_secs_f64(),
    );

    result.map(|()| Json(StatusResponse::ok()))
}

async fn health_check_handler(State(service): State<SessionState>) -> Json<serde_json::Value> {
    debug!("Health check requested");

    Json(serde_json::json!({
        "status": "healthy",
        "service": "sessions",
        "backend": service.backend_name(),
        "realm": service.realm(),
        "active_sessions": service.active_sessions(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::KeyStorage;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    fn app() -> (Router, SessionState) {
        let service = Arc::new(CredentialService::new("test.realm", KeyStorage::default()));
        (create_router(service.clone()), service)
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/sessions")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_and_conflict() {
        let (app, service) = app();

        let resp = app
            .clone()
            .oneshot(post_json(r#"{"user_id":"alice","key":"pw1"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = app
            .oneshot(post_json(r#"{"user_id":"alice","key":"pw2"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        assert_eq!(service.statistics().started, 1);
    }

    #[tokio::test]
    async fn test_malformed_bodies_are_bad_request() {
        let (app, service) = app();

        for body in [
            "not json",
            r#"{"user_id":"alice"}"#,
            r#"{"user_id":42,"key":"pw"}"#,
            r#"{"user_id":"","key":"pw"}"#,
        ] {
            let resp = app.clone().oneshot(post_json(body)).await.unwrap();
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {body}");
        }

        // 缺少 Content-Type 同样视为请求格式错误
        let req = Request::builder()
            .method("POST")
            .uri("/sessions")
            .body(Body::from(r#"{"user_id":"alice","key":"pw"}"#))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        assert_eq!(service.active_sessions(), 0);
    }

    #[tokio::test]
    async fn test_delete_unknown_user_is_not_found() {
        let (app, _) = app();
        let req = Request::builder()
            .method("DELETE")
            .uri("/sessions/nobody")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
