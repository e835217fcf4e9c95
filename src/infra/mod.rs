//! 基础设施层 - 日志、路径、本机信息

pub mod localnet;
pub mod logging;
pub mod paths;

pub use localnet::{local_ipv4_addrs, HostFacts};
pub use logging::LogSession;
pub use paths::{log_file_path, resolve_config_path};
