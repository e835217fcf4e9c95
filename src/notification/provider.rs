//! 推送渠道 trait 定义

use super::content::GeneralNotification;
use super::http::HttpTransport;
use super::response::PushResponse;
use crate::error::{PushError, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use url::Url;

/// 支持的推送渠道（封闭枚举）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProviderId {
    /// Bark，见 https://github.com/Finb/bark-server
    Bark,
    /// Server酱³，见 https://sc3.ft07.com
    ServChan3,
}

impl ProviderId {
    pub const ALL: [ProviderId; 2] = [ProviderId::Bark, ProviderId::ServChan3];

    /// 配置文件中使用的 key
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Bark => "bark",
            ProviderId::ServChan3 => "servchan3",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = PushError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "bark" => Ok(ProviderId::Bark),
            // sc3 是早期配置文件使用的 key
            "servchan3" | "sc3" => Ok(ProviderId::ServChan3),
            other => Err(PushError::UnknownProvider(other.to_string())),
        }
    }
}

/// 推送渠道 trait
///
/// 每个渠道负责：校验自身配置 → 把通用内容转换为自己的 payload → 发送 → 把原生响应归一化。
pub trait PushProvider {
    /// 渠道专属的请求体
    type Payload: Serialize;

    /// 渠道标识
    fn id(&self) -> ProviderId;

    /// 推送服务地址
    fn server_url(&self) -> &str;

    /// 校验配置（不做任何 I/O）
    fn validate_config(&self) -> Result<()>;

    /// 转换为渠道 payload，不修改输入
    ///
    /// 一个通用内容可能对应多个 payload（例如 Bark 的多个 device key）。
    fn transform(&self, notification: &GeneralNotification) -> Result<Vec<Self::Payload>>;

    /// 解析原生响应为统一响应
    fn parse_response(&self, body: &[u8]) -> Result<PushResponse>;

    /// 序列化并发送一个 payload
    fn send(&self, http: &dyn HttpTransport, payload: &Self::Payload) -> Result<PushResponse> {
        let body = serde_json::to_vec(payload)?;
        let response = http.post_json(self.server_url(), &body)?;
        self.parse_response(&response.body)
    }
}

/// 校验推送服务地址：非空、可解析、http(s)、带 host
pub fn validate_server_url(provider: ProviderId, raw: &str) -> Result<Url> {
    if raw.trim().is_empty() {
        return Err(PushError::Config(format!("{}: serverURL is required", provider)));
    }

    let url = Url::parse(raw)
        .map_err(|e| PushError::Config(format!("{}: invalid serverURL {:?}: {}", provider, raw, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(PushError::Config(format!(
            "{}: serverURL must be http or https, got {}",
            provider,
            url.scheme()
        )));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(PushError::Config(format!("{}: serverURL has no host", provider)));
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_id_from_str() {
        assert_eq!("bark".parse::<ProviderId>().unwrap(), ProviderId::Bark);
        assert_eq!("servchan3".parse::<ProviderId>().unwrap(), ProviderId::ServChan3);
        assert_eq!("sc3".parse::<ProviderId>().unwrap(), ProviderId::ServChan3);

        let err = "telegram".parse::<ProviderId>().unwrap_err();
        assert!(matches!(err, PushError::UnknownProvider(ref s) if s == "telegram"));
    }

    #[test]
    fn test_provider_id_ordering_is_stable() {
        let mut ids = vec![ProviderId::ServChan3, ProviderId::Bark];
        ids.sort();
        assert_eq!(ids, ProviderId::ALL.to_vec());
    }

    #[test]
    fn test_validate_server_url() {
        assert!(validate_server_url(ProviderId::Bark, "https://api.day.app/push").is_ok());
        assert!(validate_server_url(ProviderId::Bark, "http://127.0.0.1:8080/push").is_ok());

        for bad in ["", "   ", "not a url", "ftp://example.com/push", "file:///tmp/x"] {
            let err = validate_server_url(ProviderId::Bark, bad).unwrap_err();
            assert!(err.is_config_error(), "{bad:?} should be rejected");
        }
    }
}
