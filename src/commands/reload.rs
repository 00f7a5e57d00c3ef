use anyhow::Result;
use colored::Colorize;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use crate::pid::{read_pid, resolve_path};
#[cfg(unix)]
use power_bill::config;
#[cfg(unix)]
use power_bill::signals::send_signal_to_pid;
#[cfg(unix)]
use tokio::signal::unix::SignalKind;
#[cfg(unix)]
use tracing::info;

/// Execute the reload command
///
/// Sends SIGHUP to the running process, which drops its cached tariff
/// catalog so the next request reads the dataset from disk
#[cfg(unix)]
pub fn execute(config_path: &Path, pid_file: Option<PathBuf>) -> Result<()> {
    let cfg = config::load_config(config_path)?;
    let pid = read_pid(&resolve_path(pid_file, &cfg.server))?;

    println!(
        "{} {}",
        "Reloading tariff dataset".yellow(),
        format!("(PID: {})", pid).cyan()
    );
    info!("Sending SIGHUP to PID {} for catalog reload", pid);

    send_signal_to_pid(pid, SignalKind::hangup())?;

    println!("{}", "  Reload signal sent successfully".green());
    println!(
        "  {}",
        "Note: with refresh = \"per_request\" every request already reads the dataset".dimmed()
    );

    Ok(())
}

#[cfg(not(unix))]
pub fn execute(_config_path: &Path, _pid_file: Option<PathBuf>) -> Result<()> {
    anyhow::bail!("{}", "Reload command is not supported on this platform".red());
}
