use anyhow::{bail, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::info;

#[cfg(unix)]
use crate::pid::{process_alive, read_pid, resolve_path};
#[cfg(unix)]
use nix::libc;
#[cfg(unix)]
use power_bill::config;
#[cfg(unix)]
use power_bill::signals::send_signal_to_pid;
#[cfg(unix)]
use tokio::signal::unix::SignalKind;

/// Execute the stop command
///
/// Sends SIGTERM to the PID recorded in the PID file and polls until the
/// process exits; with `force`, escalates to SIGKILL after `timeout` seconds
#[cfg(unix)]
pub async fn execute(
    config_path: &Path,
    pid_file: Option<PathBuf>,
    force: bool,
    timeout: u64,
) -> Result<()> {
    let cfg = config::load_config(config_path)?;
    let pid = read_pid(&resolve_path(pid_file, &cfg.server))?;

    println!("{} {}", "Stopping power-bill".yellow(), format!("(PID: {})", pid).cyan());
    info!("Sending SIGTERM to PID {}", pid);

    send_signal_to_pid(pid, SignalKind::terminate())?;
    println!("  Sent SIGTERM, waiting for graceful shutdown...");

    let start = Instant::now();
    let timeout_duration = Duration::from_secs(timeout);

    while start.elapsed() < timeout_duration {
        if !process_alive(pid) {
            println!("{}", "  Server stopped successfully".green());
            info!("Server stopped successfully");
            return Ok(());
        }
        sleep(Duration::from_millis(500)).await;
    }

    if !force {
        bail!(
            "Timeout after {} seconds. Use --force to kill immediately.",
            timeout
        );
    }

    println!("{}", "  Timeout reached, force killing...".red());
    info!("Force killing PID {}", pid);
    send_signal_to_pid(pid, SignalKind::from_raw(libc::SIGKILL))?;
    sleep(Duration::from_secs(1)).await;

    if process_alive(pid) {
        bail!("Failed to kill process even with SIGKILL");
    }

    println!("{}", "  Server force stopped".yellow());
    Ok(())
}

#[cfg(not(unix))]
pub async fn execute(
    _config_path: &Path,
    _pid_file: Option<PathBuf>,
    _force: bool,
    _timeout: u64,
) -> Result<()> {
    bail!("Stop command is not supported on this platform");
}
