//! RDP 登录事件 → 通用推送内容

use super::config::DEFAULT_DOMAIN;
use super::content::GeneralNotification;

/// 登录成功通知的标题
pub const LOGIN_SUCCESS_TITLE: &str = "RDP Login - Success";

/// 一次 RDP 登录事件（由任务计划程序传入）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginEvent {
    /// 认证域，本地账户登录时可能为空
    pub domain: String,
    pub username: String,
    /// 来源地址
    pub source: String,
}

impl LoginEvent {
    pub fn new(
        domain: impl Into<String>,
        username: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            username: username.into(),
            source: source.into(),
        }
    }
}

/// 登录通知构建器
#[derive(Debug, Clone)]
pub struct LoginNotificationBuilder {
    hostname: String,
    local_ips: Vec<String>,
    default_domain: String,
}

impl LoginNotificationBuilder {
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            local_ips: Vec::new(),
            default_domain: DEFAULT_DOMAIN.to_string(),
        }
    }

    /// 设置本机 IP 列表
    pub fn local_ips(mut self, ips: Vec<String>) -> Self {
        self.local_ips = ips;
        self
    }

    /// 设置登录域为空时的替代值
    pub fn default_domain(mut self, domain: impl Into<String>) -> Self {
        self.default_domain = domain.into();
        self
    }

    /// 构建通知
    pub fn build(&self, event: &LoginEvent) -> GeneralNotification {
        let domain = if event.domain.trim().is_empty() {
            self.default_domain.as_str()
        } else {
            event.domain.as_str()
        };

        let description = format!(
            "From: {} - {}\\{}\nHost: {}, IPs: {}",
            event.source,
            domain,
            event.username,
            self.hostname,
            self.local_ips.join(", ")
        );

        GeneralNotification::new(LOGIN_SUCCESS_TITLE, description)
            .with_short_title(format!("User {} from {}", event.username, event.source))
            .with_extra_param("copy", self.hostname.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_login_notification() {
        let n = LoginNotificationBuilder::new("WIN-1")
            .local_ips(vec!["192.168.1.10".to_string()])
            .build(&LoginEvent::new("CORP", "alice", "10.0.0.5"));

        assert_eq!(n.title, "RDP Login - Success");
        assert_eq!(n.short_title, "User alice from 10.0.0.5");
        assert_eq!(
            n.description,
            "From: 10.0.0.5 - CORP\\alice\nHost: WIN-1, IPs: 192.168.1.10"
        );
        assert_eq!(n.extra_str("copy"), Some("WIN-1"));
        assert!(n.tags_or_groups.is_empty());
        assert_eq!(n.missing_required_field(), None);
    }

    #[test]
    fn test_empty_domain_uses_default() {
        let event = LoginEvent::new("", "bob", "10.0.0.7");

        let n = LoginNotificationBuilder::new("WIN-1").build(&event);
        assert!(n.description.starts_with("From: 10.0.0.7 - .\\bob"));

        let n = LoginNotificationBuilder::new("WIN-1")
            .default_domain("localhost")
            .build(&event);
        assert!(n.description.starts_with("From: 10.0.0.7 - localhost\\bob"));
    }

    #[test]
    fn test_multiple_ips_joined() {
        let n = LoginNotificationBuilder::new("WIN-1")
            .local_ips(vec!["10.1.1.1".to_string(), "172.16.0.2".to_string()])
            .build(&LoginEvent::new("CORP", "alice", "10.0.0.5"));
        assert!(n.description.ends_with("IPs: 10.1.1.1, 172.16.0.2"));
    }
}
