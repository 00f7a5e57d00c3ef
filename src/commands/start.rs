use anyhow::Result;
use colored::Colorize;
use power_bill::{config, init_tracing, server};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::pid::{self, PidFile};

/// Execute the start command
///
/// Runs in the foreground until SIGTERM/SIGINT; the PID file is held for
/// the whole run
pub async fn execute(config_path: &Path, pid_file: Option<PathBuf>) -> Result<()> {
    let cfg = config::load_config(config_path)?;

    init_tracing(&cfg.server.log_level, &cfg.server.log_format);
    println!("{}", "Starting power-bill in foreground mode...".green());
    info!("Loaded configuration from {}", config_path.display());

    let pid_file = PidFile::acquire(pid::resolve_path(pid_file, &cfg.server))?;
    info!("PID file: {}", pid_file.path().display());

    // Blocks until shutdown
    server::start_server(cfg).await?;

    Ok(())
}
