use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod pid;

use power_bill::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let command = args.get_command();

    // The start command initializes tracing itself, from the loaded configuration
    if !matches!(command, cli::Commands::Start { .. }) {
        init_tracing("warn", "text");
    }

    match command {
        cli::Commands::Start { pid_file } => {
            commands::start::execute(&args.config, pid_file).await?;
        }
        cli::Commands::Stop {
            pid_file,
            force,
            timeout,
        } => {
            commands::stop::execute(&args.config, pid_file, force, timeout).await?;
        }
        cli::Commands::Reload { pid_file } => {
            commands::reload::execute(&args.config, pid_file)?;
        }
        cli::Commands::Test => {
            commands::test::execute(&args.config).await?;
        }
        cli::Commands::Config { action } => match action {
            cli::ConfigCommands::Show => commands::config::show(&args.config)?,
            cli::ConfigCommands::Validate => commands::config::validate(&args.config)?,
        },
        cli::Commands::Calculate { input } => {
            commands::calculate::execute(&input).await?;
        }
        cli::Commands::Tariffs { tariff_id } => {
            commands::tariffs::execute(&args.config, tariff_id).await?;
        }
        cli::Commands::Version => {
            println!("power-bill v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
