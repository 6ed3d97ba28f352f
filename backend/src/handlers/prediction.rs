//! HTTP handlers for disaster prediction endpoints

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use shared::{BatchResult, Coordinate};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::AppState;

/// Response header carrying the identifier for later retrieval
pub const RESULT_ID_HEADER: &str = "x-result-id";

/// Batch prediction request body
#[derive(Debug, Deserialize)]
pub struct PredictDisasterRequest {
    pub coordinates: Vec<Coordinate>,
}

impl PredictDisasterRequest {
    fn check(&self) -> AppResult<()> {
        if self.coordinates.is_empty() {
            return Err(AppError::Validation {
                field: "coordinates".to_string(),
                message: "At least one coordinate is required".to_string(),
            });
        }

        for (index, coordinate) in self.coordinates.iter().enumerate() {
            coordinate.validate().map_err(|e| AppError::Validation {
                field: format!("coordinates[{}]", index),
                message: e.to_string(),
            })?;
        }

        Ok(())
    }
}

/// Predict disasters for a batch of coordinates
pub async fn predict_disaster(
    State(state): State<AppState>,
    Json(request): Json<PredictDisasterRequest>,
) -> AppResult<impl IntoResponse> {
    request.check()?;

    let (result_id, result) = state.predictions.run_batch(request.coordinates).await?;

    Ok(([(RESULT_ID_HEADER, result_id)], Json(result)))
}

/// Retrieve a previously computed batch result
pub async fn get_result(
    State(state): State<AppState>,
    Path(result_id): Path<String>,
) -> AppResult<Json<BatchResult>> {
    let result = state.predictions.get_result(&result_id).await?;
    Ok(Json(result))
}
