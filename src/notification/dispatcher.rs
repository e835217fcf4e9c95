//! 推送分发器 - 把一份通用内容依次投递到所有已配置的渠道
//!
//! 状态机：`Unstaged → Staged → Dispatched`。
//! 渠道按 `ProviderId` 顺序逐个处理，任何一步出错立即中止剩余渠道。

use super::config::{ProviderConfig, PushConfig};
use super::content::GeneralNotification;
use super::http::{HttpTransport, ReqwestTransport};
use super::provider::{ProviderId, PushProvider};
use super::response::PushResponse;
use crate::error::{PushError, Result};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Debug)]
enum DispatchState {
    Unstaged,
    Staged(GeneralNotification),
    Dispatched,
}

/// 单个渠道的投递结果
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderDelivery {
    pub provider: ProviderId,
    /// 每个 payload 一条（Bark 按 device key）
    pub responses: Vec<PushResponse>,
}

/// 一次成功分发的汇总
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DispatchReport {
    pub dry_run: bool,
    pub deliveries: Vec<ProviderDelivery>,
}

impl DispatchReport {
    /// 实际发出的请求数
    pub fn sent_count(&self) -> usize {
        self.deliveries.iter().map(|d| d.responses.len()).sum()
    }
}

/// 推送分发器
pub struct Pusher {
    providers: Vec<ProviderConfig>,
    is_dry_run: bool,
    http: Arc<dyn HttpTransport>,
    state: DispatchState,
}

impl Pusher {
    /// 创建分发器，所有渠道配置在这里一次性解码并校验
    pub fn new(config: &PushConfig, http: Arc<dyn HttpTransport>) -> Result<Self> {
        let providers = config.providers()?;

        info!(
            providers = ?providers.iter().map(ProviderConfig::id).collect::<Vec<_>>(),
            dry_run = config.is_dry_run,
            "Pusher initialized"
        );

        Ok(Self {
            providers,
            is_dry_run: config.is_dry_run,
            http,
            state: DispatchState::Unstaged,
        })
    }

    /// 使用 reqwest 作为出网实现
    pub fn from_config(config: &PushConfig) -> Result<Self> {
        let http = ReqwestTransport::new(config.timeout)?;
        Self::new(config, Arc::new(http))
    }

    /// 已配置的渠道
    pub fn provider_ids(&self) -> Vec<ProviderId> {
        self.providers.iter().map(ProviderConfig::id).collect()
    }

    pub fn is_staged(&self) -> bool {
        matches!(self.state, DispatchState::Staged(_))
    }

    /// stage 通用内容，重复调用以最后一次为准
    pub fn stage(&mut self, notification: GeneralNotification) -> Result<()> {
        if matches!(self.state, DispatchState::Dispatched) {
            return Err(PushError::AlreadyDispatched);
        }
        if let Some(field) = notification.missing_required_field() {
            return Err(PushError::InvalidContent(field));
        }
        self.state = DispatchState::Staged(notification);
        Ok(())
    }

    /// 分发已 stage 的内容
    ///
    /// 失败后内容被消耗，需要重新 stage；成功后不能再次分发。
    pub fn dispatch(&mut self) -> Result<DispatchReport> {
        let notification = match std::mem::replace(&mut self.state, DispatchState::Unstaged) {
            DispatchState::Staged(n) => n,
            DispatchState::Unstaged => return Err(PushError::NotStaged),
            DispatchState::Dispatched => {
                self.state = DispatchState::Dispatched;
                return Err(PushError::AlreadyDispatched);
            }
        };

        if self.is_dry_run {
            info!("Config is set to dry-run, no HTTP request will be sent");
            self.state = DispatchState::Dispatched;
            return Ok(DispatchReport {
                dry_run: true,
                deliveries: Vec::new(),
            });
        }

        let mut report = DispatchReport::default();
        for provider in &self.providers {
            let responses = match provider {
                ProviderConfig::Bark(p) => deliver(p, self.http.as_ref(), &notification)?,
                ProviderConfig::ServChan3(p) => deliver(p, self.http.as_ref(), &notification)?,
            };
            report.deliveries.push(ProviderDelivery {
                provider: provider.id(),
                responses,
            });
        }

        self.state = DispatchState::Dispatched;
        Ok(report)
    }
}

/// transform → send → 记录响应，遇错即停
fn deliver<P: PushProvider>(
    provider: &P,
    http: &dyn HttpTransport,
    notification: &GeneralNotification,
) -> Result<Vec<PushResponse>> {
    let id = provider.id();

    let payloads = provider.transform(notification).map_err(|e| {
        error!(provider = %id, error = %e, "Failed to transform to specific push content");
        e
    })?;

    let mut responses = Vec::with_capacity(payloads.len());
    for payload in &payloads {
        let response = provider.send(http, payload).map_err(|e| {
            error!(provider = %id, error = %e, "Failed to send push content");
            e
        })?;
        info!(provider = %id, response = %response, "Push response received");
        responses.push(response);
    }

    Ok(responses)
}
