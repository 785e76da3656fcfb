//! Prometheus 监控指标模块
//!
//! 持有全局 Registry，汇总各服务的指标并以文本格式导出

use lazy_static::lazy_static;
use prometheus::{IntGaugeVec, Opts, Registry};
use session::CredentialService;
use session::metrics::ActiveSessionsCollector;
use std::sync::{Arc, Once};

static METRICS_INIT: Once = Once::new();

lazy_static! {
    /// 全局 Prometheus Registry
    pub static ref REGISTRY: Registry = Registry::new();

    /// 服务运行状态（1 运行中，0 未运行）
    pub static ref SERVICE_UP: IntGaugeVec = IntGaugeVec::new(
        Opts::new("service_up", "Whether a service is currently running")
            .namespace("turn_server"),
        &["service"]
    ).unwrap();
}

/// 注册所有指标到全局 Registry
///
/// 幂等：只有第一次调用会真正注册。
pub fn register_metrics() -> Result<(), prometheus::Error> {
    let mut result = Ok(());

    METRICS_INIT.call_once(|| {
        let register_result = (|| {
            REGISTRY.register(Box::new(SERVICE_UP.clone()))?;
            session::register_session_metrics(&REGISTRY)?;
            Ok::<(), prometheus::Error>(())
        })();

        if let Err(e) = register_result {
            result = Err(e);
        }
    });

    result
}

/// 注册当前会话数指标，值在每次抓取时从凭据服务读取
///
/// 每个进程只应调用一次，重复注册返回 `AlreadyReg`。
pub fn register_active_sessions(service: Arc<CredentialService>) -> Result<(), prometheus::Error> {
    REGISTRY.register(Box::new(ActiveSessionsCollector::new(service)?))
}

/// 标记服务运行状态
pub fn set_service_up(service: &str, up: bool) {
    SERVICE_UP.with_label_values(&[service]).set(i64::from(up));
}

/// 导出 Prometheus 文本格式的指标
pub fn export_metrics() -> Result<String, prometheus::Error> {
    use prometheus::Encoder;
    let encoder = prometheus::TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;

    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}
