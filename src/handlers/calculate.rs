use axum::{body::Bytes, extract::State, Json};
use tracing::{debug, warn};

use crate::billing::{calculate_checked, parse_bill_input, BillResult};
use crate::error::AppError;
use crate::handlers::AppState;
use crate::metrics;

/// Handle POST /calculate
///
/// The body is decoded here rather than through the `Json` extractor so
/// malformed JSON surfaces as an input coercion error.
pub async fn handle_calculate(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<BillResult>, AppError> {
    let result = calculate_bill(&state, &body).await;
    metrics::record_calculation(result.is_ok());
    result.map(Json)
}

async fn calculate_bill(state: &AppState, body: &[u8]) -> Result<BillResult, AppError> {
    if state.require_catalog_on_calculate {
        state.catalog.catalog().await?;
    }

    let result = parse_bill_input(body)
        .and_then(|input| calculate_checked(&input))
        .map_err(|e| {
            warn!("Rejected calculation input: {}", e);
            e
        })?;
    debug!(
        billing_days = result.billing_days,
        total_consumption = result.total_consumption,
        total_bill = result.total_bill,
        "Bill calculated"
    );

    Ok(result)
}
