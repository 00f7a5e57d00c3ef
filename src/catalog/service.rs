use arc_swap::ArcSwapOption;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::catalog::loader::{load_catalog, CatalogError};
use crate::catalog::models::{TariffCatalog, TariffProfile, TariffSummary};

/// When the dataset file is re-read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPolicy {
    /// Read the file on every access, nothing is cached
    PerRequest,
    /// Serve a parsed snapshot until it is older than the given age
    Ttl(Duration),
}

struct Snapshot {
    catalog: Arc<TariffCatalog>,
    loaded_at: Instant,
}

/// Read access to the tariff dataset
pub struct CatalogService {
    path: PathBuf,
    policy: RefreshPolicy,
    snapshot: ArcSwapOption<Snapshot>,
}

impl CatalogService {
    pub fn new(path: impl Into<PathBuf>, policy: RefreshPolicy) -> Self {
        Self {
            path: path.into(),
            policy,
            snapshot: ArcSwapOption::empty(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn policy(&self) -> RefreshPolicy {
        self.policy
    }

    /// Current dataset according to the refresh policy
    ///
    /// A failed load never falls back to an older snapshot.
    pub async fn catalog(&self) -> Result<Arc<TariffCatalog>, CatalogError> {
        let ttl = match self.policy {
            RefreshPolicy::PerRequest => return load_catalog(&self.path).await.map(Arc::new),
            RefreshPolicy::Ttl(ttl) => ttl,
        };

        if let Some(snapshot) = self.snapshot.load_full() {
            if snapshot.loaded_at.elapsed() < ttl {
                return Ok(snapshot.catalog.clone());
            }
            debug!("Tariff catalog snapshot expired, reloading");
        }

        match load_catalog(&self.path).await {
            Ok(catalog) => {
                let catalog = Arc::new(catalog);
                self.snapshot.store(Some(Arc::new(Snapshot {
                    catalog: catalog.clone(),
                    loaded_at: Instant::now(),
                })));
                Ok(catalog)
            }
            Err(e) => {
                self.snapshot.store(None);
                Err(e)
            }
        }
    }

    /// Drop the cached snapshot so the next access reads the file
    pub fn invalidate(&self) {
        if self.snapshot.swap(None).is_some() {
            info!("Tariff catalog snapshot invalidated");
        }
    }

    pub async fn find_tariff(&self, tariff_id: &str) -> Result<Option<TariffProfile>, CatalogError> {
        let catalog = self.catalog().await?;
        Ok(catalog.find(tariff_id).cloned())
    }

    pub async fn summaries(&self) -> Result<Vec<TariffSummary>, CatalogError> {
        Ok(self.catalog().await?.summaries())
    }

    pub async fn general_costs(&self) -> Result<Value, CatalogError> {
        Ok(self.catalog().await?.general_costs.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    fn write_dataset(path: &Path, company: &str) {
        let doc = json!({
            "tariff_profiles": [
                {"tariff_id": "t1", "company": company, "profile": "Basic", "price_punta": 0.2}
            ],
            "general_costs": {"vat_rate": 21}
        });
        fs::write(path, doc.to_string()).unwrap();
    }

    #[tokio::test]
    async fn test_per_request_picks_up_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tariffs.json");
        write_dataset(&path, "Acme");

        let service = CatalogService::new(&path, RefreshPolicy::PerRequest);
        assert_eq!(service.find_tariff("t1").await.unwrap().unwrap().company, "Acme");

        write_dataset(&path, "Globex");
        assert_eq!(service.find_tariff("t1").await.unwrap().unwrap().company, "Globex");
    }

    #[tokio::test]
    async fn test_per_request_never_serves_stale_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tariffs.json");
        write_dataset(&path, "Acme");

        let service = CatalogService::new(&path, RefreshPolicy::PerRequest);
        assert!(service.summaries().await.is_ok());

        fs::remove_file(&path).unwrap();
        assert!(service.summaries().await.is_err());
        assert!(service.general_costs().await.is_err());
    }

    #[tokio::test]
    async fn test_ttl_serves_snapshot_until_invalidated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tariffs.json");
        write_dataset(&path, "Acme");

        let service = CatalogService::new(&path, RefreshPolicy::Ttl(Duration::from_secs(3600)));
        assert_eq!(service.find_tariff("t1").await.unwrap().unwrap().company, "Acme");

        write_dataset(&path, "Globex");
        assert_eq!(service.find_tariff("t1").await.unwrap().unwrap().company, "Acme");

        service.invalidate();
        assert_eq!(service.find_tariff("t1").await.unwrap().unwrap().company, "Globex");
    }

    #[tokio::test]
    async fn test_ttl_expiry_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tariffs.json");
        write_dataset(&path, "Acme");

        let service = CatalogService::new(&path, RefreshPolicy::Ttl(Duration::ZERO));
        service.catalog().await.unwrap();

        write_dataset(&path, "Globex");
        assert_eq!(service.find_tariff("t1").await.unwrap().unwrap().company, "Globex");
    }

    #[tokio::test]
    async fn test_failed_reload_drops_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tariffs.json");
        write_dataset(&path, "Acme");

        let service = CatalogService::new(&path, RefreshPolicy::Ttl(Duration::ZERO));
        service.catalog().await.unwrap();

        fs::write(&path, "{ broken").unwrap();
        assert!(matches!(
            service.catalog().await.unwrap_err(),
            CatalogError::Parse { .. }
        ));
        assert!(service.snapshot.load().is_none());
    }

    #[tokio::test]
    async fn test_unknown_tariff_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tariffs.json");
        write_dataset(&path, "Acme");

        let service = CatalogService::new(&path, RefreshPolicy::PerRequest);
        assert!(service.find_tariff("nope").await.unwrap().is_none());
        assert_eq!(service.general_costs().await.unwrap(), json!({"vat_rate": 21}));
    }

    #[test]
    fn test_reports_configured_source() {
        let service = CatalogService::new(
            "/srv/tariffs.json",
            RefreshPolicy::Ttl(Duration::from_secs(5)),
        );
        assert_eq!(service.path(), Path::new("/srv/tariffs.json"));
        assert_eq!(service.policy(), RefreshPolicy::Ttl(Duration::from_secs(5)));
    }
}
