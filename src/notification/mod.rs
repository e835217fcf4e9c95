//! 推送抽象层 - 一份通用内容，多个推送渠道
//!
//! # 设计目标
//! 1. 统一接口：所有渠道实现 `PushProvider` trait
//! 2. 封闭分发：渠道由 `ProviderId` 枚举决定，未知渠道在校验阶段即报错
//! 3. 先校验后发送：所有渠道配置通过校验之前不发出任何请求
//! 4. 单一出网点：所有请求经过 `HttpTransport::post_json`
//!
//! # 使用示例
//! ```ignore
//! use rdp_alert::notification::{GeneralNotification, PushConfig, Pusher};
//!
//! let config = PushConfig::load(path)?;
//! let mut pusher = Pusher::from_config(&config)?;
//! pusher.stage(GeneralNotification::new("RDP Login - Success", "From: ..."))?;
//! pusher.dispatch()?;
//! ```

pub mod config;
pub mod content;
pub mod dispatcher;
pub mod event;
pub mod http;
pub mod provider;
pub mod providers;
pub mod response;

pub use config::{ProviderConfig, PushConfig};
pub use content::GeneralNotification;
pub use dispatcher::{DispatchReport, ProviderDelivery, Pusher};
pub use event::{LoginEvent, LoginNotificationBuilder};
pub use http::{HttpResponse, HttpTransport, ReqwestTransport};
pub use provider::{ProviderId, PushProvider};
pub use response::PushResponse;
