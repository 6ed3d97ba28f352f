//! Batch prediction service
//!
//! Runs the per-coordinate pipeline (resolve, build prompt, invoke model,
//! extract, validate) as one task per coordinate and assembles the results in
//! request order. A failure in one task only affects that task's slot.

use chrono::Utc;
use shared::{validate_forecast_now, BatchResult, Coordinate, ForecastRecord};
use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::error::{AppError, AppResult, ForecastInvocationError};
use crate::external::{
    ChatCompletionClient, ForecastModel, NominatimClient, PromptPayload, ReverseGeocoder,
};
use crate::services::location::LocationResolver;
use crate::services::store::{self, InMemoryResultStore, ResultStore};
use crate::services::{extraction, prompt};

/// Outcome of one coordinate's pipeline
pub type TaskOutcome = Result<ForecastRecord, ForecastInvocationError>;

/// Orchestrates disaster predictions for batches of coordinates
#[derive(Clone)]
pub struct PredictionService {
    resolver: LocationResolver,
    model: Arc<dyn ForecastModel>,
    store: Arc<dyn ResultStore>,
}

impl PredictionService {
    pub fn new(
        geocoder: Arc<dyn ReverseGeocoder>,
        model: Arc<dyn ForecastModel>,
        store: Arc<dyn ResultStore>,
    ) -> Self {
        Self {
            resolver: LocationResolver::new(geocoder),
            model,
            store,
        }
    }

    /// Wire the service to the configured providers
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let geocoder = NominatimClient::new(&config.geocoding)?;
        let model = ChatCompletionClient::new(&config.model)?;
        let store = InMemoryResultStore::with_capacity(config.results.capacity);

        Ok(Self::new(Arc::new(geocoder), Arc::new(model), Arc::new(store)))
    }

    /// Predict disasters for every coordinate and retain the batch result
    ///
    /// Returns the result identifier alongside the result. Fails only for an
    /// empty request or a fault outside the per-coordinate pipelines.
    pub async fn run_batch(&self, coordinates: Vec<Coordinate>) -> AppResult<(String, BatchResult)> {
        if coordinates.is_empty() {
            return Err(AppError::Validation {
                field: "coordinates".to_string(),
                message: "At least one coordinate is required".to_string(),
            });
        }

        let started = Instant::now();
        tracing::info!("Predicting disasters for {} locations", coordinates.len());

        let handles: Vec<_> = coordinates
            .iter()
            .map(|&coordinate| {
                let service = self.clone();
                tokio::spawn(async move { service.predict(coordinate).await })
            })
            .collect();

        // Joined in request order so slot i always belongs to coordinate i
        let mut predictions = Vec::with_capacity(coordinates.len());
        for (coordinate, handle) in coordinates.iter().zip(handles) {
            let record = match handle.await {
                Ok(Ok(record)) => record,
                Ok(Err(e)) => {
                    tracing::warn!("{}", e);
                    ForecastRecord::failed(coordinate, &e)
                }
                Err(e) => {
                    tracing::error!("Prediction task for {} aborted: {}", coordinate, e);
                    ForecastRecord::failed(coordinate, format!("task aborted: {}", e))
                }
            };
            predictions.push(record);
        }

        let result = BatchResult::new(predictions, Utc::now());
        let result_id = store::result_id(&coordinates)?;
        self.store.put(result_id.clone(), result.clone()).await;

        tracing::info!(
            "Batch {} completed: {} locations, {} failed, {:?}",
            result_id,
            result.total_locations,
            result.failed_count(),
            started.elapsed()
        );

        Ok((result_id, result))
    }

    /// Look up a previously computed batch result
    pub async fn get_result(&self, result_id: &str) -> AppResult<BatchResult> {
        self.store.get(result_id).await.ok_or_else(|| {
            AppError::NotFound(
                "Result not found. The prediction may have expired or never existed.".to_string(),
            )
        })
    }

    /// Run the pipeline for a single coordinate
    pub async fn predict(&self, coordinate: Coordinate) -> TaskOutcome {
        let resolved = self.resolver.resolve(&coordinate).await;
        let payload = prompt::build(&coordinate, &resolved, Utc::now());
        let raw = self.invoke(&coordinate, &payload).await?;

        tracing::debug!("Raw model output for {}: {}", coordinate, raw);

        let record = extraction::extract(&raw, &coordinate, &resolved);
        if record.is_error() {
            return Ok(record);
        }
        Ok(validate_forecast_now(record))
    }

    async fn invoke(
        &self,
        coordinate: &Coordinate,
        payload: &PromptPayload,
    ) -> Result<String, ForecastInvocationError> {
        self.model
            .complete(payload)
            .await
            .map_err(|cause| ForecastInvocationError {
                coordinate: *coordinate,
                cause,
            })
    }
}
