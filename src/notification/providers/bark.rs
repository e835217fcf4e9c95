//! Bark 渠道
//!
//! 请求体遵循 bark-server API v2（`POST /push`，JSON）。
//! 一个 device key 对应一次请求。

use crate::error::{PushError, Result};
use crate::notification::content::GeneralNotification;
use crate::notification::provider::{validate_server_url, ProviderId, PushProvider};
use crate::notification::response::PushResponse;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 未配置分组且通知没有标签时使用的分组
pub const DEFAULT_GROUP: &str = "Security_RDPAlert";

/// iOS 通知级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BarkLevel {
    #[default]
    #[serde(rename = "active")]
    Active,
    #[serde(rename = "timeSensitive")]
    TimeSensitive,
    #[serde(rename = "passive")]
    Passive,
    #[serde(rename = "critical")]
    Critical,
}

/// Bark 渠道配置（pushMethods.bark）
#[derive(Debug, Clone, Deserialize)]
pub struct BarkProvider {
    #[serde(rename = "serverURL", default)]
    pub server_url: String,
    #[serde(rename = "extParams", default)]
    pub ext_params: BarkExtParams,
}

/// Bark 额外参数
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarkExtParams {
    /// 至少一个 device key
    #[serde(default)]
    pub device_keys: Vec<String>,
    pub notification_level: Option<BarkLevel>,
    pub notification_group: Option<String>,
    /// 铃声文件名，如 `alarm.caf`
    pub sound: Option<String>,
    pub icon: Option<String>,
    /// 点击通知后跳转的地址
    pub url: Option<String>,
    pub badge: Option<u32>,
}

/// Bark 请求体
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarkPayload {
    pub title: String,
    pub body: String,
    pub device_key: String,
    pub subtitle: String,
    pub level: BarkLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<u32>,
    /// 只能是 "0" 或 "1"
    #[serde(rename = "automaticallyCopy")]
    pub automatically_copy: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub group: String,
    /// 只能是 "0" 或 "1"
    #[serde(rename = "isArchive")]
    pub is_archive: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Bark 原生响应
#[derive(Debug, Deserialize)]
struct BarkResponse {
    code: i64,
    #[serde(default)]
    message: String,
    #[serde(default)]
    timestamp: i64,
}

fn non_empty(s: &Option<String>) -> Option<String> {
    s.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl BarkProvider {
    pub fn new(server_url: impl Into<String>, ext_params: BarkExtParams) -> Self {
        Self {
            server_url: server_url.into(),
            ext_params,
        }
    }

    fn device_keys(&self) -> impl Iterator<Item = &str> {
        self.ext_params
            .device_keys
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
    }
}

impl PushProvider for BarkProvider {
    type Payload = BarkPayload;

    fn id(&self) -> ProviderId {
        ProviderId::Bark
    }

    fn server_url(&self) -> &str {
        &self.server_url
    }

    fn validate_config(&self) -> Result<()> {
        validate_server_url(self.id(), &self.server_url)?;

        if self.ext_params.device_keys.is_empty() {
            return Err(PushError::Config("bark: extParams.deviceKeys is required".into()));
        }
        if self.ext_params.device_keys.iter().any(|k| k.trim().is_empty()) {
            return Err(PushError::Config("bark: empty device key in extParams.deviceKeys".into()));
        }
        if let Some(link) = non_empty(&self.ext_params.url) {
            url::Url::parse(&link)
                .map_err(|e| PushError::Config(format!("bark: invalid extParams.url: {}", e)))?;
        }
        if self.ext_params.badge == Some(0) {
            return Err(PushError::Config("bark: extParams.badge must be greater than 0".into()));
        }

        Ok(())
    }

    fn transform(&self, notification: &GeneralNotification) -> Result<Vec<BarkPayload>> {
        if let Some(field) = notification.missing_required_field() {
            return Err(PushError::transform(self.id(), format!("{} is required", field)));
        }

        let subtitle = if notification.short_title.trim().is_empty() {
            notification.title.clone()
        } else {
            notification.short_title.clone()
        };

        let ext = &self.ext_params;
        let group = non_empty(&ext.notification_group)
            .or_else(|| {
                notification
                    .tags_or_groups
                    .iter()
                    .map(|t| t.trim())
                    .find(|t| !t.is_empty())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| DEFAULT_GROUP.to_string());

        // 默认值 → 通知的额外参数 → 配置的额外参数
        let template = BarkPayload {
            title: notification.title.clone(),
            body: notification.description.clone(),
            device_key: String::new(),
            subtitle,
            level: ext.notification_level.unwrap_or_default(),
            badge: ext.badge,
            automatically_copy: "1".to_string(),
            copy: notification.extra_str("copy").map(str::to_string),
            sound: non_empty(&ext.sound).or_else(|| notification.extra_str("sound").map(str::to_string)),
            icon: non_empty(&ext.icon).or_else(|| notification.extra_str("icon").map(str::to_string)),
            group,
            is_archive: "1".to_string(),
            url: non_empty(&ext.url).or_else(|| notification.extra_str("url").map(str::to_string)),
        };

        let payloads: Vec<BarkPayload> = self
            .device_keys()
            .map(|key| BarkPayload {
                device_key: key.to_string(),
                ..template.clone()
            })
            .collect();

        if payloads.is_empty() {
            return Err(PushError::transform(self.id(), "no device key configured"));
        }

        debug!(provider = "bark", count = payloads.len(), "Bark payloads prepared");
        Ok(payloads)
    }

    fn parse_response(&self, body: &[u8]) -> Result<PushResponse> {
        let resp: BarkResponse = serde_json::from_slice(body)?;
        let mut normalized = PushResponse::now(resp.code, resp.message);
        if resp.timestamp > 0 {
            normalized.timestamp = resp.timestamp;
        }
        Ok(normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(keys: &[&str]) -> BarkProvider {
        BarkProvider::new(
            "https://api.day.app/push",
            BarkExtParams {
                device_keys: keys.iter().map(|k| k.to_string()).collect(),
                ..Default::default()
            },
        )
    }

    fn notification() -> GeneralNotification {
        GeneralNotification::new("RDP Login - Success", "From: 10.0.0.5 - CORP\\alice")
            .with_short_title("User alice from 10.0.0.5")
            .with_extra_param("copy", "WIN-1")
    }

    #[test]
    fn test_validate_requires_device_keys() {
        let err = provider(&[]).validate_config().unwrap_err();
        assert!(err.to_string().contains("deviceKeys"));

        let err = provider(&["k1", " "]).validate_config().unwrap_err();
        assert!(err.is_config_error());

        assert!(provider(&["k1"]).validate_config().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_server_url() {
        let mut p = provider(&["k1"]);
        p.server_url = "api.day.app/push".to_string();
        assert!(p.validate_config().unwrap_err().is_config_error());
    }

    #[test]
    fn test_validate_rejects_zero_badge() {
        let mut p = provider(&["k1"]);
        p.ext_params.badge = Some(0);
        assert!(p.validate_config().is_err());
    }

    #[test]
    fn test_transform_applies_defaults() {
        let payloads = provider(&["k1"]).transform(&notification()).unwrap();
        assert_eq!(payloads.len(), 1);

        let p = &payloads[0];
        assert_eq!(p.device_key, "k1");
        assert_eq!(p.subtitle, "User alice from 10.0.0.5");
        assert_eq!(p.level, BarkLevel::Active);
        assert_eq!(p.automatically_copy, "1");
        assert_eq!(p.is_archive, "1");
        assert_eq!(p.copy.as_deref(), Some("WIN-1"));
        assert_eq!(p.group, DEFAULT_GROUP);
    }

    #[test]
    fn test_transform_subtitle_falls_back_to_title() {
        let n = GeneralNotification::new("RDP Login - Success", "body");
        let payloads = provider(&["k1"]).transform(&n).unwrap();
        assert_eq!(payloads[0].subtitle, "RDP Login - Success");
    }

    #[test]
    fn test_transform_config_overrides_notification() {
        let mut p = provider(&["k1"]);
        p.ext_params.notification_level = Some(BarkLevel::TimeSensitive);
        p.ext_params.notification_group = Some("Ops".to_string());
        p.ext_params.sound = Some("alarm.caf".to_string());

        let n = notification()
            .with_extra_param("sound", "bell.caf")
            .with_tags(["Security"]);
        let payload = &p.transform(&n).unwrap()[0];

        assert_eq!(payload.level, BarkLevel::TimeSensitive);
        assert_eq!(payload.group, "Ops");
        assert_eq!(payload.sound.as_deref(), Some("alarm.caf"));
    }

    #[test]
    fn test_transform_group_from_first_tag() {
        let n = notification().with_tags(["Security", "RDP"]);
        let payload = &provider(&["k1"]).transform(&n).unwrap()[0];
        assert_eq!(payload.group, "Security");
    }

    #[test]
    fn test_transform_group_skips_blank_tags() {
        let n = notification().with_tags(["", "  ", "RDP"]);
        let payload = &provider(&["k1"]).transform(&n).unwrap()[0];
        assert_eq!(payload.group, "RDP");

        let n = notification().with_tags([""]);
        let payload = &provider(&["k1"]).transform(&n).unwrap()[0];
        assert_eq!(payload.group, DEFAULT_GROUP);
    }

    #[test]
    fn test_transform_one_payload_per_device_key() {
        let payloads = provider(&["k1", "k2", "k3"]).transform(&notification()).unwrap();
        let keys: Vec<_> = payloads.iter().map(|p| p.device_key.as_str()).collect();
        assert_eq!(keys, vec!["k1", "k2", "k3"]);
        assert!(payloads.iter().all(|p| p.title == "RDP Login - Success"));
        assert!(payloads.iter().all(|p| p.body == payloads[0].body));
    }

    #[test]
    fn test_transform_rejects_empty_title() {
        let n = GeneralNotification::new("", "body");
        let err = provider(&["k1"]).transform(&n).unwrap_err();
        assert!(matches!(err, PushError::Transform { provider: ProviderId::Bark, .. }));
    }

    #[test]
    fn test_transform_does_not_mutate_input() {
        let n = notification();
        let before = n.clone();
        let _ = provider(&["k1", "k2"]).transform(&n).unwrap();
        assert_eq!(n, before);
    }

    #[test]
    fn test_payload_wire_names() {
        let payload = &provider(&["k1"]).transform(&notification()).unwrap()[0];
        let json = serde_json::to_value(payload).unwrap();

        assert_eq!(json["device_key"], "k1");
        assert_eq!(json["automaticallyCopy"], "1");
        assert_eq!(json["isArchive"], "1");
        assert_eq!(json["level"], "active");
        assert!(json.get("badge").is_none());
        assert!(json.get("url").is_none());
    }

    #[test]
    fn test_parse_response() {
        let body = br#"{"code":200,"message":"success","timestamp":1700000000}"#;
        let resp = provider(&["k1"]).parse_response(body).unwrap();
        assert_eq!(resp.code, 200);
        assert_eq!(resp.message, "success");
        assert_eq!(resp.timestamp, 1_700_000_000);
    }

    #[test]
    fn test_parse_response_rejects_garbage() {
        let err = provider(&["k1"]).parse_response(b"<html>").unwrap_err();
        assert!(matches!(err, PushError::Parse(_)));
    }

    #[test]
    fn test_decode_config_ignores_unknown_ext_params() {
        let p: BarkProvider = serde_json::from_value(serde_json::json!({
            "serverURL": "https://api.day.app/push",
            "extParams": {
                "deviceKeys": ["k1"],
                "notificationLevel": "critical",
                "somethingElse": true
            }
        }))
        .unwrap();

        assert_eq!(p.ext_params.notification_level, Some(BarkLevel::Critical));
        assert!(p.validate_config().is_ok());
    }
}
