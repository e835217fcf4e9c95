//! RDP Alert CLI
//!
//! RDP 登录后推送告警，参数个数不对时 clap 打印用法并以非零状态退出。

use clap::Parser;
use rdp_alert::cli::{handle_alert, AlertArgs};
use rdp_alert::infra::logging::DEBUG_ENV;
use rdp_alert::infra::{log_file_path, LogSession};
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "rdpalert")]
#[command(about = "RDP Alert - RDP 登录后通过 Bark / Server酱³ 推送告警")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    alert: AlertArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut session = match LogSession::open(&log_file_path()) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("CRITICAL: {:#}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = session.install(std::env::var_os(DEBUG_ENV).is_some()) {
        eprintln!("failed to initialize logging: {:#}", e);
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        log_file = %session.path().display(),
        "Logging file prepared"
    );

    let code = match handle_alert(cli.alert) {
        Ok(_) => {
            info!("Push request sent to server, done");
            ExitCode::SUCCESS
        }
        Err(e) => {
            // critical: 记录后以非零状态退出
            error!(error = %format!("{:#}", e), "CRITICAL");
            ExitCode::FAILURE
        }
    };

    if let Err(e) = session.dispose() {
        eprintln!("failed to close log file: {:#}", e);
    }
    code
}
