//! Server酱³ 渠道
//!
//! serverURL 形如 `https://<uid>.push.ft07.com/send/<sendkey>.send`，sendkey 已包含在地址中。

use crate::error::{PushError, Result};
use crate::notification::content::GeneralNotification;
use crate::notification::provider::{validate_server_url, ProviderId, PushProvider};
use crate::notification::response::PushResponse;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 多个标签之间的分隔符
const TAG_SEPARATOR: &str = "|";

/// Server酱³ 渠道配置（pushMethods.servchan3）
#[derive(Debug, Clone, Deserialize)]
pub struct ServChan3Provider {
    #[serde(rename = "serverURL", default)]
    pub server_url: String,
    #[serde(rename = "extParams", default)]
    pub ext_params: ServChan3ExtParams,
}

/// Server酱³ 额外参数
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServChan3ExtParams {
    #[serde(default)]
    pub custom_push_tags: Vec<String>,
}

/// Server酱³ 请求体
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServChan3Payload {
    pub title: String,
    pub desp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,
}

/// Server酱³ 原生响应
#[derive(Debug, Deserialize)]
struct ServChan3Response {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    errno: i64,
    #[serde(default, deserialize_with = "lenient_data")]
    data: ServChan3ResponseData,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Default, Deserialize)]
struct ServChan3ResponseData {
    /// 数字或字符串，视服务端版本而定
    #[serde(default)]
    pushid: Value,
    /// 其余字段（readkey、各平台的请求元数据等）
    #[serde(flatten)]
    meta: Map<String, Value>,
}

/// 出错时服务端会返回 `"data": null`，部分版本返回空数组 `[]`，都按空数据处理
fn lenient_data<'de, D>(deserializer: D) -> std::result::Result<ServChan3ResponseData, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => serde_json::from_value(value).map_err(serde::de::Error::custom),
        _ => Ok(ServChan3ResponseData::default()),
    }
}

impl ServChan3ResponseData {
    fn pushid(&self) -> String {
        match &self.pushid {
            Value::Null => "-".to_string(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl ServChan3Provider {
    pub fn new(server_url: impl Into<String>, ext_params: ServChan3ExtParams) -> Self {
        Self {
            server_url: server_url.into(),
            ext_params,
        }
    }
}

impl PushProvider for ServChan3Provider {
    type Payload = ServChan3Payload;

    fn id(&self) -> ProviderId {
        ProviderId::ServChan3
    }

    fn server_url(&self) -> &str {
        &self.server_url
    }

    fn validate_config(&self) -> Result<()> {
        validate_server_url(self.id(), &self.server_url)?;
        if self
            .ext_params
            .custom_push_tags
            .iter()
            .any(|t| t.contains(TAG_SEPARATOR))
        {
            return Err(PushError::Config(format!(
                "servchan3: customPushTags must not contain {:?}",
                TAG_SEPARATOR
            )));
        }
        Ok(())
    }

    fn transform(&self, notification: &GeneralNotification) -> Result<Vec<ServChan3Payload>> {
        if let Some(field) = notification.missing_required_field() {
            return Err(PushError::transform(self.id(), format!("{} is required", field)));
        }

        let tags = if self.ext_params.custom_push_tags.is_empty() {
            &notification.tags_or_groups
        } else {
            &self.ext_params.custom_push_tags
        };
        let tags: Vec<&str> = tags
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect();

        let short = notification.short_title.trim();

        Ok(vec![ServChan3Payload {
            title: notification.title.clone(),
            desp: notification.description.clone(),
            tags: (!tags.is_empty()).then(|| tags.join(TAG_SEPARATOR)),
            short: (!short.is_empty()).then(|| notification.short_title.clone()),
        }])
    }

    fn parse_response(&self, body: &[u8]) -> Result<PushResponse> {
        let resp: ServChan3Response = serde_json::from_slice(body)?;

        let mut message = format!(
            "ErrorNo: {}, PushID: {}, OriRespMsg: {}",
            resp.errno,
            resp.data.pushid(),
            resp.message
        );
        if !resp.data.meta.is_empty() {
            message.push_str(&format!(", Meta: {}", Value::Object(resp.data.meta)));
        }

        Ok(PushResponse::now(resp.code, message))
    }
}
