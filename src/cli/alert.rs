//! 登录告警命令处理
//!
//! 由 Windows 任务计划程序在 RDP 登录事件（4624）触发时调用：
//! `rdpalert.exe <Auth Domain> <Auth Username> <Auth IP>`

use crate::infra::{resolve_config_path, HostFacts};
use crate::notification::{DispatchReport, LoginEvent, LoginNotificationBuilder, PushConfig, Pusher};
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

/// 登录告警参数
#[derive(Args, Debug)]
pub struct AlertArgs {
    /// 认证域（可以为空字符串）
    pub domain: String,
    /// 认证用户名
    pub username: String,
    /// 来源地址
    pub address: String,
    /// 配置文件路径（默认查找可执行文件旁的 rdpalert_pushconf.json）
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}

impl AlertArgs {
    fn event(&self) -> LoginEvent {
        LoginEvent::new(&self.domain, &self.username, &self.address)
    }
}

/// 处理一次登录告警
pub fn handle_alert(args: AlertArgs) -> Result<DispatchReport> {
    let config_path = resolve_config_path(args.config.as_deref())?;
    info!(path = %config_path.display(), "Config file located");

    let config = PushConfig::load(&config_path).context("load push config")?;
    let pusher = Pusher::from_config(&config).context("new pusher")?;

    let host = HostFacts::collect().context("collect host facts")?;
    info!(hostname = %host.hostname, ips = ?host.local_ips, "Host facts collected");

    run_alert(&args, &config, pusher, &host)
}

/// 构建通知并分发（不做任何文件或系统查询）
pub fn run_alert(
    args: &AlertArgs,
    config: &PushConfig,
    mut pusher: Pusher,
    host: &HostFacts,
) -> Result<DispatchReport> {
    let notification = LoginNotificationBuilder::new(&host.hostname)
        .local_ips(host.local_ips.clone())
        .default_domain(&config.default_domain)
        .build(&args.event());

    pusher.stage(notification).context("stage push content")?;
    info!("Push content staged");

    let report = pusher.dispatch().context("send push request")?;
    info!(
        dry_run = report.dry_run,
        providers = report.deliveries.len(),
        sent = report.sent_count(),
        "Push dispatched"
    );

    Ok(report)
}
