pub mod calculate;
pub mod health;
pub mod metrics_handler;
pub mod tariffs;

use std::sync::Arc;

use crate::catalog::CatalogService;

/// Shared state for request handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogService>,
    /// Calculation requests fail while the tariff dataset cannot be loaded
    pub require_catalog_on_calculate: bool,
}
