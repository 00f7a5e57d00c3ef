use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::billing::InputError;
use crate::catalog::CatalogError;

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// Request body could not be coerced into bill input
    #[error("Calculation failed: {0}")]
    InvalidInput(#[from] InputError),
    /// Tariff dataset missing or malformed
    #[error("Tariff dataset unavailable: {0}")]
    DatasetUnavailable(#[from] CatalogError),
    /// No tariff with the requested identifier
    #[error("Tariff not found: {0}")]
    TariffNotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::TariffNotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidInput(_) | Self::DatasetUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": {
                "message": self.to_string(),
                "type": error_type_name(&self),
            }
        }));

        (status, body).into_response()
    }
}

fn error_type_name(error: &AppError) -> &'static str {
    match error {
        AppError::InvalidInput(_) => "invalid_input",
        AppError::DatasetUnavailable(_) => "dataset_unavailable",
        AppError::TariffNotFound(_) => "tariff_not_found",
    }
}
