//! 通用推送内容 - 与具体渠道无关的通知表示

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 通用推送内容
///
/// 由调用方根据事件生成，stage 到 `Pusher` 后对所有渠道只读。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralNotification {
    /// 标题
    pub title: String,
    /// 短标题（Bark 的 subtitle，ServerChan3 的 short）
    pub short_title: String,
    /// 正文
    pub description: String,
    /// 额外参数，渠道只读取自己认识的 key
    #[serde(default)]
    pub extra_params: Map<String, Value>,
    /// 标签或分组
    #[serde(default)]
    pub tags_or_groups: Vec<String>,
}

impl GeneralNotification {
    /// 创建通知
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            short_title: String::new(),
            description: description.into(),
            extra_params: Map::new(),
            tags_or_groups: Vec::new(),
        }
    }

    /// 设置短标题
    pub fn with_short_title(mut self, short_title: impl Into<String>) -> Self {
        self.short_title = short_title.into();
        self
    }

    /// 添加额外参数
    pub fn with_extra_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra_params.insert(key.into(), value.into());
        self
    }

    /// 设置标签/分组
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags_or_groups = tags.into_iter().map(Into::into).collect();
        self
    }

    /// 读取字符串类型的额外参数，空字符串视为不存在
    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra_params
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// 检查 stage 前必须满足的条件，返回缺失字段名
    pub fn missing_required_field(&self) -> Option<&'static str> {
        if self.title.trim().is_empty() {
            Some("title")
        } else if self.description.trim().is_empty() {
            Some("description")
        } else {
            None
        }
    }
}
