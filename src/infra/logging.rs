//! 日志会话 - 文件日志的打开、安装与释放
//!
//! 日志始终追加写入文件；设置 `RDPALERT_DEBUG` 时同时输出到 stderr。
//! 通过 RUST_LOG 控制级别，默认 info。

use anyhow::{anyhow, Context, Result};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// 存在时日志同时输出到 stderr
pub const DEBUG_ENV: &str = "RDPALERT_DEBUG";

const DEFAULT_FILTER: &str = "rdp_alert=info,rdpalert=info";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Disposed,
}

/// 日志会话，持有日志文件
#[derive(Debug)]
pub struct LogSession {
    path: PathBuf,
    file: Arc<File>,
    state: SessionState,
}

impl LogSession {
    /// 以追加模式打开日志文件
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("open log file {}", path.display()))?;

        Ok(Self {
            path: path.to_path_buf(),
            file: Arc::new(file),
            state: SessionState::Active,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// 安装全局 tracing subscriber（每个进程只能一次）
    pub fn install(&self, mirror_to_stderr: bool) -> Result<()> {
        if self.state != SessionState::Active {
            return Err(anyhow!("log session already disposed"));
        }

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let file_layer = fmt::layer()
            .with_writer(self.file.clone())
            .with_ansi(false)
            .with_target(false);

        let stderr_layer = mirror_to_stderr.then(|| {
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
        });

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(stderr_layer)
            .try_init()
            .context("install tracing subscriber")?;

        Ok(())
    }

    /// 刷盘并结束会话，只能调用一次
    pub fn dispose(&mut self) -> Result<()> {
        if self.state == SessionState::Disposed {
            return Err(anyhow!("log session already disposed"));
        }
        self.state = SessionState::Disposed;
        self.file.sync_all().context("sync log file")?;
        Ok(())
    }
}

impl Drop for LogSession {
    fn drop(&mut self) {
        if self.state == SessionState::Active {
            let _ = self.file.sync_all();
        }
    }
}
