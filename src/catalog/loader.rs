use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::catalog::models::TariffCatalog;
use crate::metrics;

/// Tariff dataset could not be loaded
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read tariff dataset {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse tariff dataset {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Parse a dataset document
pub fn parse_catalog(json: &str) -> Result<TariffCatalog, serde_json::Error> {
    let catalog: TariffCatalog = serde_json::from_str(json)?;

    let mut seen = HashSet::new();
    for profile in &catalog.tariff_profiles {
        if !seen.insert(profile.tariff_id.as_str()) {
            warn!(
                tariff_id = %profile.tariff_id,
                "Duplicate tariff_id in dataset, only the first record is reachable"
            );
        }
    }

    Ok(catalog)
}

/// Read and parse the dataset file
pub async fn load_catalog(path: &Path) -> Result<TariffCatalog, CatalogError> {
    let started = Instant::now();
    let result = read_and_parse(path).await;
    metrics::record_catalog_load(result.is_ok(), started.elapsed());

    match &result {
        Ok(catalog) => info!(
            "Loaded {} tariff profiles from {}",
            catalog.tariff_profiles.len(),
            path.display()
        ),
        Err(e) => error!("{}", e),
    }

    result
}

async fn read_and_parse(path: &Path) -> Result<TariffCatalog, CatalogError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    parse_catalog(&content).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
