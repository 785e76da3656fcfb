//! 会话服务 Prometheus 指标

use crate::service::CredentialService;
use lazy_static::lazy_static;
use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts};
use std::sync::Arc;

lazy_static! {
    /// 会话创建结果（ok / conflict / invalid / error）
    pub static ref SESSIONS_CREATED: IntCounterVec = IntCounterVec::new(
        Opts::new("sessions_created_total", "Total number of session creation attempts")
            .namespace("turn_server"),
        &["result"]
    ).unwrap();

    /// 会话删除次数
    pub static ref SESSIONS_REMOVED: IntCounter = IntCounter::with_opts(
        Opts::new("sessions_removed_total", "Total number of removed sessions")
            .namespace("turn_server")
    ).unwrap();

    /// TURN 认证查询结果（hit / miss）
    pub static ref AUTH_LOOKUPS: IntCounterVec = IntCounterVec::new(
        Opts::new("auth_lookups_total", "Total number of TURN credential lookups")
            .namespace("turn_server"),
        &["result"]
    ).unwrap();

    pub static ref REQUEST_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new("request_duration_seconds", "HTTP request duration in seconds")
            .namespace("turn_server")
            .buckets(vec![0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0]),
        &["method", "path", "status"]
    ).unwrap();

    pub static ref REQUESTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("requests_total", "Total number of HTTP requests")
            .namespace("turn_server"),
        &["method", "path", "status"]
    ).unwrap();
}

/// 注册会话服务 metrics 到给定 registry
pub fn register_session_metrics(registry: &prometheus::Registry) -> Result<(), prometheus::Error> {
    registry.register(Box::new(SESSIONS_CREATED.clone()))?;
    registry.register(Box::new(SESSIONS_REMOVED.clone()))?;
    registry.register(Box::new(AUTH_LOOKUPS.clone()))?;
    registry.register(Box::new(REQUEST_DURATION.clone()))?;
    registry.register(Box::new(REQUESTS_TOTAL.clone()))?;
    Ok(())
}

/// 当前持有凭据的用户数
///
/// 抓取时直接读取存储条目数，不在请求路径上维护。
pub struct ActiveSessionsCollector {
    service: Arc<CredentialService>,
    gauge: IntGauge,
}

impl ActiveSessionsCollector {
    pub fn new(service: Arc<CredentialService>) -> Result<Self, prometheus::Error> {
        let gauge = IntGauge::with_opts(
            Opts::new("active_sessions", "Number of users holding a TURN credential")
                .namespace("turn_server"),
        )?;
        Ok(Self { service, gauge })
    }
}

impl Collector for ActiveSessionsCollector {
    fn desc(&self) -> Vec<&Desc> {
        self.gauge.desc()
    }

    fn collect(&self) -> Vec<MetricFamily> {
        self.gauge.set(self.service.active_sessions() as i64);
        self.gauge.collect()
    }
}

/// 记录一次 HTTP 请求
pub fn observe_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let status = status.to_string();
    REQUEST_DURATION
        .with_label_values(&[method, path, &status])
        .observe(duration_secs);
    REQUESTS_TOTAL
        .with_label_values(&[method, path, &status])
        .inc();
}
