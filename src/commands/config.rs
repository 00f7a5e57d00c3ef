use anyhow::Result;
use colored::Colorize;
use power_bill::config::{self, Config};
use std::path::Path;
use tracing::info;

/// Execute the config show command
///
/// Prints the effective configuration (file plus environment overrides) as TOML
pub fn show(config_path: &Path) -> Result<()> {
    println!("{}", "Loading configuration...".yellow());
    info!("Loading configuration for display");

    let cfg = config::load_config(config_path)?;

    println!("{}", "Current Configuration:".green().bold());
    println!();
    println!("{}", toml::to_string_pretty(&cfg)?);

    Ok(())
}

/// Execute the config validate command
pub fn validate(config_path: &Path) -> Result<()> {
    println!("{}", "Validating configuration...".yellow());
    info!("Validating configuration file {}", config_path.display());

    let cfg = config::load_config(config_path)?;

    println!("{}", "✓ Configuration is valid".green());
    println!();
    print_summary(&cfg);

    Ok(())
}

pub(crate) fn print_summary(cfg: &Config) {
    println!("{}", "Summary:".bold());
    println!("  {}: {}:{}", "Server".cyan(), cfg.server.host, cfg.server.port);
    println!(
        "  {}: {} ({})",
        "Logging".cyan(),
        cfg.server.log_level,
        cfg.server.log_format
    );
    println!("  {}: {}", "PID File".cyan(), cfg.server.pid_file.display());
    println!("  {}: {}", "Tariff Dataset".cyan(), cfg.catalog.path.display());
    println!("  {}: {}", "Refresh".cyan(), describe_refresh(cfg));
    println!(
        "  {}: {}",
        "CORS Origins".cyan(),
        cfg.cors.allowed_origins.join(", ")
    );
    println!(
        "  {}: {}",
        "Metrics".cyan(),
        if cfg.metrics.enabled {
            "enabled".green()
        } else {
            "disabled".red()
        }
    );
}

fn describe_refresh(cfg: &Config) -> String {
    match cfg.catalog.refresh {
        config::RefreshMode::PerRequest => "reload on every request".to_string(),
        config::RefreshMode::Ttl => format!("cached for {}s", cfg.catalog.ttl_seconds),
    }
}
