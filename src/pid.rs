use anyhow::{bail, Context, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use power_bill::config::ServerConfig;

/// `--pid-file` wins over `server.pid_file`
pub fn resolve_path(cli_override: Option<PathBuf>, server: &ServerConfig) -> PathBuf {
    cli_override.unwrap_or_else(|| server.pid_file.clone())
}

/// Exclusively locked PID file held for the lifetime of the server
///
/// The lock is released when the handle is dropped, including on crash, so a
/// file that can be locked belongs to a dead process.
#[derive(Debug)]
pub struct PidFile {
    path: PathBuf,
    _file: File,
}

impl PidFile {
    pub fn acquire(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        // Not truncated on open: the previous owner's PID is read first
        #[allow(clippy::suspicious_open_options)]
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(&path)
            .with_context(|| format!("Failed to open PID file {}", path.display()))?;

        if file.try_lock_exclusive().is_err() {
            let owner = read_from(&mut file)
                .map(|pid| pid.to_string())
                .unwrap_or_else(|_| "unknown".to_string());
            bail!(
                "power-bill is already running (PID {}, lock held on {})",
                owner,
                path.display()
            );
        }

        if let Ok(stale) = read_from(&mut file) {
            warn!("Replacing stale PID file {} (PID {})", path.display(), stale);
        }

        let pid = std::process::id();
        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        writeln!(file, "{}", pid)?;
        file.flush()?;
        info!("Wrote PID {} to {}", pid, path.display());

        Ok(Self { path, _file: file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for PidFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => info!("Removed PID file {}", self.path.display()),
            Err(e) => warn!("Failed to remove PID file {}: {}", self.path.display(), e),
        }
    }
}

/// PID recorded by a running server
pub fn read_pid(path: &Path) -> Result<u32> {
    let mut file = File::open(path).with_context(|| {
        format!(
            "Cannot open PID file {}. Is power-bill running?",
            path.display()
        )
    })?;
    read_from(&mut file)
}

fn read_from(file: &mut File) -> Result<u32> {
    file.seek(SeekFrom::Start(0))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;

    let trimmed = contents.trim();
    trimmed
        .parse::<u32>()
        .with_context(|| format!("PID file does not hold a process id: '{}'", trimmed))
}

/// Whether a process with this PID exists (sends signal 0)
#[cfg(unix)]
pub fn process_alive(pid: u32) -> bool {
    use nix::errno::Errno;
    use nix::sys::signal::kill;
    use nix::unistd::Pid;

    match kill(Pid::from_raw(pid as i32), None) {
        Ok(()) | Err(Errno::EPERM) => true,
        Err(_) => false,
    }
}
