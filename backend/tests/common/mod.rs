//! Test doubles for the external collaborators

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, Utc};
use disaster_forecast_backend::error::{GeocodeError, ModelError};
use disaster_forecast_backend::external::{Address, ForecastModel, PromptPayload, ReverseGeocoder};
use disaster_forecast_backend::services::{InMemoryResultStore, PredictionService};
use serde_json::{json, Value};
use std::sync::Arc;

/// Geocoder naming every point after its coordinates
pub struct StubGeocoder;

#[async_trait]
impl ReverseGeocoder for StubGeocoder {
    async fn reverse(
        &self,
        coordinate: &shared::Coordinate,
    ) -> Result<Option<Address>, GeocodeError> {
        Ok(Some(Address {
            city: Some(format!("City {}", coordinate.latitude)),
            state: Some("Test State".to_string()),
            country: Some("Testland".to_string()),
            display_name: Some(format!("City {}, Test State, Testland", coordinate.latitude)),
            ..Address::default()
        }))
    }
}

/// Geocoder that is always down
pub struct DownGeocoder;

#[async_trait]
impl ReverseGeocoder for DownGeocoder {
    async fn reverse(&self, _: &shared::Coordinate) -> Result<Option<Address>, GeocodeError> {
        Err(GeocodeError::Status(503))
    }
}

type Script = dyn Fn(&PromptPayload) -> Result<String, ModelError> + Send + Sync;

/// Model answering through a closure over the prompt
pub struct ScriptedModel {
    script: Box<Script>,
}

impl ScriptedModel {
    pub fn new(
        script: impl Fn(&PromptPayload) -> Result<String, ModelError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            script: Box::new(script),
        }
    }
}

#[async_trait]
impl ForecastModel for ScriptedModel {
    async fn complete(&self, payload: &PromptPayload) -> Result<String, ModelError> {
        (self.script)(payload)
    }
}

/// The "- Coordinates: lat, lon" value of a prompt's context block
pub fn prompt_coordinates(payload: &PromptPayload) -> String {
    payload
        .user
        .lines()
        .find_map(|line| line.strip_prefix("- Coordinates: "))
        .unwrap_or_default()
        .to_string()
}

/// A schema-conforming forecast starting `days_ahead` days from today
pub fn forecast_json(location: &str, days_ahead: i64) -> Value {
    let start = Utc::now().date_naive() + Duration::days(days_ahead);
    let end = start + Duration::days(5);
    json!({
        "disaster_name": "Flood",
        "severity": "High",
        "country": "Testland",
        "state": "Test State",
        "location": location,
        "latitude": 0.0,
        "longitude": 0.0,
        "start_day": start.format("%Y-%m-%d").to_string(),
        "end_day": end.format("%Y-%m-%d").to_string(),
        "evacuations": 12000,
        "affected_population": 90000,
        "disaster_details": {
            "description": "River overflow after monsoon rains",
            "primary_risks": ["inundation", "landslides"],
            "vulnerable_areas": ["riverbank settlements"],
            "expected_impact": "Road closures",
            "historical_context": "Annual flooding",
            "contributing_factors": ["deforestation"]
        },
        "evacuation_plan": {
            "preparation_phase": ["Prepare go-bags"],
            "immediate_actions": ["Move to higher ground"],
            "during_disaster": ["Avoid moving water"],
            "evacuation_routes": ["Highway 1 north"],
            "post_disaster": ["Boil water"],
            "emergency_contacts": ["112"],
            "essential_supplies": ["Water", "Food"]
        }
    })
}

/// Model answering every prompt with a valid forecast naming the prompt's coordinates
pub fn echo_model() -> ScriptedModel {
    ScriptedModel::new(|payload| Ok(forecast_json(&prompt_coordinates(payload), 120).to_string()))
}

pub fn service_with(model: ScriptedModel) -> PredictionService {
    PredictionService::new(
        Arc::new(StubGeocoder),
        Arc::new(model),
        Arc::new(InMemoryResultStore::new()),
    )
}
