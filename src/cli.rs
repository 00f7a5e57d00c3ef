use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "power-bill", version, about = "Electricity bill calculator")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the HTTP server (default)
    Start {
        /// PID file path (defaults to server.pid_file)
        #[arg(short, long)]
        pid_file: Option<PathBuf>,
    },

    /// Stop a running server
    Stop {
        /// PID file path (defaults to server.pid_file)
        #[arg(short, long)]
        pid_file: Option<PathBuf>,

        /// Force kill if graceful shutdown times out
        #[arg(short, long)]
        force: bool,

        /// Timeout in seconds for graceful shutdown
        #[arg(short, long, default_value = "30")]
        timeout: u64,
    },

    /// Make a running server reload the tariff dataset (sends SIGHUP)
    Reload {
        /// PID file path (defaults to server.pid_file)
        #[arg(short, long)]
        pid_file: Option<PathBuf>,
    },

    /// Test configuration and tariff dataset
    Test,

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Calculate a bill from a JSON input file ("-" reads stdin)
    Calculate {
        /// Input file with BillInput fields
        input: PathBuf,
    },

    /// Query the tariff dataset
    Tariffs {
        /// Tariff identifier; lists all tariffs when omitted
        tariff_id: Option<String>,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Display the effective configuration
    Show,

    /// Validate configuration file
    Validate,
}

impl Cli {
    /// Get the command to execute, defaulting to Start if none provided
    pub fn get_command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or(Commands::Start { pid_file: None })
    }
}
