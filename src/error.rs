//! 推送错误类型

use crate::notification::provider::ProviderId;

/// 推送流程中可能出现的错误
///
/// 任何一种错误都会中断本次分发，由调用方决定如何处理（通常是记录 critical 日志后退出）。
#[derive(Debug, thiserror::Error)]
pub enum PushError {
    /// 配置缺失或格式错误（发生在任何网络请求之前）
    #[error("config error: {0}")]
    Config(String),

    /// pushMethods 中出现未知的推送渠道
    #[error("push method not supported: {0}")]
    UnknownProvider(String),

    /// 无法构造渠道专属的推送内容
    #[error("transform error ({provider}): {reason}")]
    Transform { provider: ProviderId, reason: String },

    /// 服务端返回非 200 状态码，body 保留用于诊断
    #[error("push server returned status {status}: {body}")]
    Delivery { status: u16, body: String },

    /// 网络层失败（连接、超时、读取 body）
    #[error("HTTP request failed: {0}")]
    Network(String),

    /// 请求体序列化或响应体解析失败
    #[error("JSON error: {0}")]
    Parse(#[from] serde_json::Error),

    /// stage 的通用内容缺少必填字段
    #[error("invalid push content: {0} is required")]
    InvalidContent(&'static str),

    /// 在 stage 之前调用 dispatch
    #[error("general push content is not staged")]
    NotStaged,

    /// 同一个 Pusher 已经成功分发过一次
    #[error("push content already dispatched")]
    AlreadyDispatched,
}

impl PushError {
    pub(crate) fn transform(provider: ProviderId, reason: impl Into<String>) -> Self {
        Self::Transform {
            provider,
            reason: reason.into(),
        }
    }

    /// 是否为配置类错误（在网络请求之前即可发现）
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::Config(_) | Self::UnknownProvider(_))
    }
}

/// 推送操作的 Result 别名
pub type Result<T> = std::result::Result<T, PushError>;
