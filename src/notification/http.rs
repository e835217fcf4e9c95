//! HTTP 投递原语 - 所有渠道共用的唯一出网入口

use crate::error::{PushError, Result};
use std::time::Duration;
use tracing::debug;

/// 固定的 JSON Content-Type
pub const POST_JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// 默认请求超时（秒）
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// 固定的 User-Agent，带构建版本号
pub fn user_agent() -> String {
    format!("rdpalert/{}", env!("CARGO_PKG_VERSION"))
}

/// HTTP 响应
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// 出网抽象，测试时可以替换为 fake 实现
pub trait HttpTransport: Send + Sync {
    /// POST JSON 并返回原始响应
    ///
    /// 状态码不是 200 时返回 `PushError::Delivery`，其中保留响应 body。
    fn post_json(&self, url: &str, body: &[u8]) -> Result<HttpResponse>;
}

/// 基于 reqwest blocking client 的实现
#[derive(Debug)]
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    /// 创建带超时的客户端
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::from_builder(Self::client_builder(timeout))
    }

    /// 已设置超时和 User-Agent 的 builder，可继续调整代理等选项
    pub fn client_builder(timeout: Duration) -> reqwest::blocking::ClientBuilder {
        reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent())
    }

    pub fn from_builder(builder: reqwest::blocking::ClientBuilder) -> Result<Self> {
        let client = builder
            .build()
            .map_err(|e| PushError::Network(format!("cannot create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    fn post_json(&self, url: &str, body: &[u8]) -> Result<HttpResponse> {
        debug!(url = %url, body_len = body.len(), "POST");

        let start = std::time::Instant::now();
        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, POST_JSON_CONTENT_TYPE)
            .body(body.to_vec())
            .send()
            .map_err(|e| PushError::Network(format!("POST {} failed: {}", url, e)))?;

        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .map_err(|e| PushError::Network(format!("reading response body: {}", e)))?;

        debug!(
            url = %url,
            status,
            elapsed_ms = start.elapsed().as_millis(),
            "POST completed"
        );

        check_status(HttpResponse {
            status,
            body: bytes.to_vec(),
        })
    }
}

/// 非 200 视为投递失败
pub(crate) fn check_status(response: HttpResponse) -> Result<HttpResponse> {
    if response.status == 200 {
        Ok(response)
    } else {
        Err(PushError::Delivery {
            status: response.status,
            body: String::from_utf8_lossy(&response.body).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_embeds_version() {
        assert_eq!(user_agent(), format!("rdpalert/{}", env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_check_status_surfaces_error_body() {
        let err = check_status(HttpResponse {
            status: 500,
            body: b"internal".to_vec(),
        })
        .unwrap_err();

        match err {
            PushError::Delivery { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "internal");
            }
            other => panic!("expected PushError::Delivery, got {other:?}"),
        }
    }

    #[test]
    fn test_check_status_rejects_other_2xx() {
        let err = check_status(HttpResponse {
            status: 204,
            body: Vec::new(),
        });
        assert!(err.is_err());
    }

    #[test]
    fn test_connection_refused_returns_network_error() {
        // port 1 is reserved and unbound
        let transport =
            ReqwestTransport::from_builder(ReqwestTransport::client_builder(Duration::from_secs(5)).no_proxy())
                .unwrap();
        let err = transport
            .post_json("http://127.0.0.1:1/push", b"{}")
            .unwrap_err();

        match &err {
            PushError::Network(msg) => {
                assert!(msg.starts_with("POST http://127.0.0.1:1/push failed:"), "{msg}");
            }
            other => panic!("expected PushError::Network, got {other:?}"),
        }
    }
}
