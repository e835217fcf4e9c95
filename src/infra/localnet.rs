//! 本机信息 - 主机名与非回环 IPv4 地址

use anyhow::{anyhow, Result};
use std::net::IpAddr;
use sysinfo::{Networks, System};
use tracing::{debug, info};

/// 推送内容需要的本机信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostFacts {
    pub hostname: String,
    pub local_ips: Vec<String>,
}

impl HostFacts {
    /// 从当前系统采集
    pub fn collect() -> Result<Self> {
        let hostname = System::host_name().ok_or_else(|| anyhow!("cannot get hostname"))?;
        let local_ips = local_ipv4_addrs()?;
        Ok(Self {
            hostname,
            local_ips,
        })
    }
}

/// 本机所有非回环 IPv4 地址
pub fn local_ipv4_addrs() -> Result<Vec<String>> {
    let networks = Networks::new_with_refreshed_list();
    let addrs = networks
        .list()
        .values()
        .flat_map(|data| data.ip_networks().iter().map(|net| net.addr));

    let ips = filter_local_ips(addrs);
    debug!(count = ips.len(), "Local IPs collected");

    if ips.is_empty() {
        return Err(anyhow!("cannot get local ip"));
    }
    for ip in &ips {
        info!(ip = %ip, "Found local ip");
    }
    Ok(ips)
}

/// 去掉回环和 IPv6，排序去重
fn filter_local_ips(addrs: impl IntoIterator<Item = IpAddr>) -> Vec<String> {
    let mut ips: Vec<IpAddr> = addrs
        .into_iter()
        .filter(|ip| ip.is_ipv4() && !ip.is_loopback() && !ip.is_unspecified())
        .collect();
    ips.sort();
    ips.dedup();
    ips.into_iter().map(|ip| ip.to_string()).collect()
}
