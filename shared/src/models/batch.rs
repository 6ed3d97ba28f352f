//! Batch prediction models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::forecast::ForecastRecord;

/// Aggregate response for one prediction request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchResult {
    /// One record per requested coordinate, in request order
    pub predictions: Vec<ForecastRecord>,
    pub timestamp: DateTime<Utc>,
    pub total_locations: usize,
}

impl BatchResult {
    pub fn new(predictions: Vec<ForecastRecord>, timestamp: DateTime<Utc>) -> Self {
        let total_locations = predictions.len();
        Self {
            predictions,
            timestamp,
            total_locations,
        }
    }

    /// Number of slots that carry an error instead of a prediction
    pub fn failed_count(&self) -> usize {
        self.predictions.iter().filter(|p| p.is_error()).count()
    }
}
