//! RDP Alert - RDP 登录后通过 Bark / Server酱³ 推送告警

pub mod cli;
pub mod error;
pub mod infra;
pub mod notification;

pub use error::{PushError, Result};
pub use infra::{HostFacts, LogSession};
pub use notification::{
    DispatchReport, GeneralNotification, LoginEvent, LoginNotificationBuilder, ProviderId,
    PushConfig, PushResponse, Pusher,
};
