use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;
use tracing::info;

use crate::catalog::{TariffDetails, TariffSummary};
use crate::error::AppError;
use crate::handlers::AppState;
use crate::metrics;

/// Handle GET /tariffs
pub async fn list_tariffs(
    State(state): State<AppState>,
) -> Result<Json<Vec<TariffSummary>>, AppError> {
    Ok(Json(state.catalog.summaries().await?))
}

/// Handle GET /tariffs/:tariff_id
pub async fn get_tariff(
    State(state): State<AppState>,
    Path(tariff_id): Path<String>,
) -> Result<Json<TariffDetails>, AppError> {
    let found = match state.catalog.find_tariff(&tariff_id).await {
        Ok(found) => found,
        Err(e) => {
            metrics::record_lookup("error");
            return Err(e.into());
        }
    };

    match found {
        Some(profile) => {
            metrics::record_lookup("found");
            Ok(Json(TariffDetails::from(profile)))
        }
        None => {
            metrics::record_lookup("not_found");
            info!("Tariff lookup miss: {}", tariff_id);
            Err(AppError::TariffNotFound(tariff_id))
        }
    }
}

/// Handle GET /general-costs
pub async fn general_costs(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    Ok(Json(state.catalog.general_costs().await?))
}
