//! 统一推送响应

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 各渠道响应归一化后的结构
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushResponse {
    pub code: i64,
    pub message: String,
    /// Unix 秒
    pub timestamp: i64,
}

impl PushResponse {
    /// 使用当前时间创建响应
    pub fn now(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            timestamp: Utc::now().timestamp(),
        }
    }
}

impl fmt::Display for PushResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let at = DateTime::<Utc>::from_timestamp(self.timestamp, 0)
            .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
            .unwrap_or_else(|| self.timestamp.to_string());
        write!(f, "Response {}: {} at time {}", self.code, self.message, at)
    }
}
