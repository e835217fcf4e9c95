//! 配置文件与日志文件路径

use anyhow::{anyhow, Context, Result};
use std::env;
use std::path::{Path, PathBuf};

/// 推送配置文件名
pub const CONFIG_FILE_NAME: &str = "rdpalert_pushconf.json";

/// 运行日志文件名
pub const LOG_FILE_NAME: &str = "rdpalert-running.log";

/// 可执行文件所在目录
pub fn exe_dir() -> Result<PathBuf> {
    let exe = env::current_exe().context("get exepath")?;
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| anyhow!("executable {} has no parent directory", exe.display()))
}

/// 日志文件路径：可执行文件旁边，取不到时使用当前目录
pub fn log_file_path() -> PathBuf {
    exe_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(LOG_FILE_NAME)
}

/// 配置文件候选位置（按优先级）
fn config_candidates(exe_dir: Option<PathBuf>, config_dir: Option<PathBuf>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(dir) = exe_dir {
        candidates.push(dir.join(CONFIG_FILE_NAME));
    }
    if let Some(dir) = config_dir {
        candidates.push(dir.join("rdpalert").join(CONFIG_FILE_NAME));
    }
    candidates
}

/// 确定配置文件路径
///
/// 1. 命令行 `--config`
/// 2. 可执行文件旁的 `rdpalert_pushconf.json`
/// 3. `<用户配置目录>/rdpalert/rdpalert_pushconf.json`
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    let candidates = config_candidates(exe_dir().ok(), dirs::config_dir());
    first_existing(&candidates).ok_or_else(|| {
        let tried: Vec<String> = candidates.iter().map(|p| p.display().to_string()).collect();
        anyhow!("config file not found, tried: {}", tried.join(", "))
    })
}

fn first_existing(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates.iter().find(|p| p.is_file()).cloned()
}
