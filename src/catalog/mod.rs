pub mod loader;
pub mod models;
pub mod service;

pub use loader::{load_catalog, parse_catalog, CatalogError};
pub use models::{TariffCatalog, TariffDetails, TariffProfile, TariffSummary};
pub use service::{CatalogService, RefreshPolicy};
