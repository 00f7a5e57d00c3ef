use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::{
    catalog::CatalogService,
    config::{Config, CorsConfig},
    handlers::{self, AppState},
    metrics,
    signals::setup_signal_handlers,
};

/// Request bodies above this size are rejected
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Start the bill calculator server
///
/// This function:
/// 1. Initializes metrics (if enabled)
/// 2. Creates the tariff catalog service
/// 3. Sets up signal handlers for graceful shutdown and catalog reload
/// 4. Binds to the configured address
/// 5. Serves requests with graceful shutdown support
pub async fn start_server(config: Config) -> Result<()> {
    let metrics_handle = if config.metrics.enabled {
        info!("Initializing Prometheus metrics...");
        Some(Arc::new(metrics::init_metrics()?))
    } else {
        None
    };

    let catalog = Arc::new(CatalogService::new(
        config.catalog.path.clone(),
        config.catalog.refresh_policy(),
    ));

    info!(
        "Tariff catalog: {} ({:?})",
        catalog.path().display(),
        catalog.policy()
    );

    // Surface a broken dataset at startup; requests still report it on their own
    if let Err(e) = catalog.catalog().await {
        warn!("Tariff catalog is not loadable yet: {}", e);
    }

    let (shutdown_tx, signal_handle) = setup_signal_handlers(catalog.clone())?;
    let mut shutdown_rx = shutdown_tx.subscribe();

    let app_state = AppState {
        catalog,
        require_catalog_on_calculate: config.catalog.require_on_calculate,
    };

    let app = create_router(app_state, &config.cors, metrics_handle);

    let addr = SocketAddr::from((
        config
            .server
            .host
            .parse::<std::net::IpAddr>()
            .with_context(|| format!("Invalid server.host '{}'", config.server.host))?,
        config.server.port,
    ));

    info!("Starting bill calculator on {}", addr);
    info!(
        "Metrics {}",
        if config.metrics.enabled { "enabled" } else { "disabled" }
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
            info!("Shutdown signal received, draining connections...");
        })
        .await?;

    signal_handle.await?;
    info!("Server stopped gracefully");

    Ok(())
}

/// Create the Axum router with all routes and middleware
pub fn create_router(
    app_state: AppState,
    cors: &CorsConfig,
    metrics_handle: Option<Arc<PrometheusHandle>>,
) -> Router {
    let api_routes = Router::new()
        .route("/calculate", post(handlers::calculate::handle_calculate))
        .route("/tariffs", get(handlers::tariffs::list_tariffs))
        .route("/tariffs/:tariff_id", get(handlers::tariffs::get_tariff))
        .route("/general-costs", get(handlers::tariffs::general_costs))
        .route("/ready", get(handlers::health::readiness_check))
        .with_state(app_state);

    let mut router = Router::new()
        .route("/health", get(handlers::health::health_check))
        .merge(api_routes);

    if let Some(handle) = metrics_handle {
        router = router.merge(
            Router::new()
                .route("/metrics", get(handlers::metrics_handler::metrics))
                .with_state(handle),
        );
    }

    router
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(build_cors_layer(cors))
        .layer(TraceLayer::new_for_http())
}

/// Build the CORS layer from configuration
///
/// Origins that are not valid header values are skipped with a warning.
fn build_cors_layer(cors: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if cors.allows_any_origin() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = cors
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    layer.allow_origin(origins)
}
