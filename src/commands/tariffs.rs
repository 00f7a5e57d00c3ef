use anyhow::{bail, Result};
use colored::Colorize;
use power_bill::catalog::{CatalogService, RefreshPolicy, TariffDetails};
use power_bill::config;
use std::path::Path;

/// Execute the tariffs command
///
/// Without an identifier, lists every tariff; with one, prints the full record
pub async fn execute(config_path: &Path, tariff_id: Option<String>) -> Result<()> {
    let cfg = config::load_config(config_path)?;
    let catalog = CatalogService::new(cfg.catalog.path, RefreshPolicy::PerRequest);

    match tariff_id {
        None => {
            let summaries = catalog.summaries().await?;
            println!("{} ({})", "Tariffs".bold(), summaries.len());
            for summary in summaries {
                println!(
                    "  {}  {} - {}",
                    summary.id.cyan(),
                    summary.company,
                    summary.name
                );
            }
        }
        Some(id) => match catalog.find_tariff(&id).await? {
            Some(profile) => {
                let details = TariffDetails::from(profile);
                println!("{}", details.description.bold());
                println!("{}", serde_json::to_string_pretty(&details.details)?);
            }
            None => bail!("Tariff not found: {}", id),
        },
    }

    Ok(())
}
