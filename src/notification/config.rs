//! 推送配置 - 解析 rdpalert_pushconf.json 并校验各渠道配置
//!
//! 配置文件示例：
//! ```json
//! {
//!   "pushMethods": {
//!     "bark": { "serverURL": "https://api.day.app/push", "extParams": { "deviceKeys": ["xxx"] } },
//!     "servchan3": { "serverURL": "https://1.push.ft07.com/send/sctp1t.send" }
//!   },
//!   "isDryRun": false
//! }
//! ```

use super::http::DEFAULT_TIMEOUT_SECS;
use super::provider::{ProviderId, PushProvider};
use super::providers::{BarkProvider, ServChan3Provider};
use crate::error::{PushError, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// 登录域为空时的默认值
pub const DEFAULT_DOMAIN: &str = ".";

/// 配置文件的原始形态，必填字段在 `PushConfig::from_json` 中检查
#[derive(Debug, Deserialize)]
struct RawPushConfig {
    #[serde(rename = "pushMethods")]
    push_methods: Option<Map<String, Value>>,
    #[serde(rename = "isDryRun")]
    is_dry_run: Option<bool>,
    #[serde(rename = "defaultDomain")]
    default_domain: Option<String>,
    #[serde(rename = "timeoutSecs")]
    timeout_secs: Option<u64>,
}

/// 推送配置
#[derive(Debug, Clone)]
pub struct PushConfig {
    /// 渠道 → 原始配置，按需解码
    pub push_methods: BTreeMap<ProviderId, Value>,
    /// 为 true 时不发送任何 HTTP 请求
    pub is_dry_run: bool,
    /// 登录域为空时使用
    pub default_domain: String,
    /// 单次 HTTP 请求超时
    pub timeout: Duration,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            push_methods: BTreeMap::new(),
            is_dry_run: false,
            default_domain: DEFAULT_DOMAIN.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl PushConfig {
    /// 设置 dry-run
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.is_dry_run = dry_run;
        self
    }

    /// 添加一个渠道的原始配置
    pub fn with_method(mut self, id: ProviderId, raw: Value) -> Self {
        self.push_methods.insert(id, raw);
        self
    }

    /// 从 JSON 文本解析
    pub fn from_json(text: &str) -> Result<Self> {
        let raw: RawPushConfig = serde_json::from_str(text)
            .map_err(|e| PushError::Config(format!("invalid config JSON: {}", e)))?;

        let methods = raw
            .push_methods
            .ok_or_else(|| PushError::Config("missing required field `pushMethods`".into()))?;
        let is_dry_run = raw
            .is_dry_run
            .ok_or_else(|| PushError::Config("missing required field `isDryRun`".into()))?;

        let mut push_methods = BTreeMap::new();
        for (key, value) in methods {
            let id: ProviderId = key.parse()?;
            if push_methods.insert(id, value).is_some() {
                return Err(PushError::Config(format!("push method {} configured twice", id)));
            }
        }

        let timeout_secs = raw.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(PushError::Config("timeoutSecs must be greater than 0".into()));
        }

        Ok(Self {
            push_methods,
            is_dry_run,
            default_domain: raw
                .default_domain
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DOMAIN.to_string()),
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// 从文件加载
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| PushError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json(&text)
    }

    /// 解码并校验全部渠道配置
    ///
    /// 任何一个渠道失败即返回错误，此时不会有任何渠道被发送。
    pub fn providers(&self) -> Result<Vec<ProviderConfig>> {
        self.push_methods
            .iter()
            .map(|(id, raw)| {
                let provider = ProviderConfig::decode(*id, raw)?;
                provider.validate()?;
                Ok(provider)
            })
            .collect()
    }
}

/// 已解码的渠道配置，每个变体持有自己的类型化配置
#[derive(Debug, Clone)]
pub enum ProviderConfig {
    Bark(BarkProvider),
    ServChan3(ServChan3Provider),
}

impl ProviderConfig {
    /// 按渠道标识解码原始配置
    pub fn decode(id: ProviderId, raw: &Value) -> Result<Self> {
        let config_err = |e: serde_json::Error| PushError::Config(format!("{}: {}", id, e));
        match id {
            ProviderId::Bark => serde_json::from_value(raw.clone())
                .map(ProviderConfig::Bark)
                .map_err(config_err),
            ProviderId::ServChan3 => serde_json::from_value(raw.clone())
                .map(ProviderConfig::ServChan3)
                .map_err(config_err),
        }
    }

    pub fn id(&self) -> ProviderId {
        match self {
            ProviderConfig::Bark(p) => p.id(),
            ProviderConfig::ServChan3(p) => p.id(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            ProviderConfig::Bark(p) => p.validate_config(),
            ProviderConfig::ServChan3(p) => p.validate_config(),
        }
    }
}
