//! HTTP服务模块

mod sessions;

pub use sessions::SessionsHttpService;
