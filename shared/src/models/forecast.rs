//! Disaster forecast models

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

use crate::models::location::{ResolvedLocation, UNKNOWN};
use crate::types::Coordinate;

/// Severity scale the model is instructed to use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Low,
    Moderate,
    High,
    Severe,
    Catastrophic,
    Unknown,
}

impl Severity {
    /// Scale offered to the model, mildest first
    pub const SCALE: [Severity; 5] = [
        Severity::Low,
        Severity::Moderate,
        Severity::High,
        Severity::Severe,
        Severity::Catastrophic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Moderate => "Moderate",
            Severity::High => "High",
            Severity::Severe => "Severe",
            Severity::Catastrophic => "Catastrophic",
            Severity::Unknown => UNKNOWN,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognized severity: {0}")]
pub struct ParseSeverityError(pub String);

impl std::str::FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "moderate" => Ok(Severity::Moderate),
            "high" => Ok(Severity::High),
            "severe" => Ok(Severity::Severe),
            "catastrophic" => Ok(Severity::Catastrophic),
            "unknown" => Ok(Severity::Unknown),
            _ => Err(ParseSeverityError(s.to_string())),
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Narrative details of the predicted disaster
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DisasterDetails {
    pub description: String,
    pub primary_risks: Vec<String>,
    pub vulnerable_areas: Vec<String>,
    pub expected_impact: String,
    pub historical_context: String,
    pub contributing_factors: Vec<String>,
}

/// Phased evacuation guidance
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EvacuationPlan {
    pub preparation_phase: Vec<String>,
    pub immediate_actions: Vec<String>,
    pub during_disaster: Vec<String>,
    pub evacuation_routes: Vec<String>,
    pub post_disaster: Vec<String>,
    pub emergency_contacts: Vec<String>,
    pub essential_supplies: Vec<String>,
}

/// Structured disaster prediction for one coordinate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastRecord {
    pub disaster_name: String,
    pub severity: String,
    pub country: String,
    pub state: String,
    pub location: String,
    // Overwritten with the requesting coordinate after parsing
    #[serde(default, deserialize_with = "deserialize_degrees")]
    pub latitude: f64,
    #[serde(default, deserialize_with = "deserialize_degrees")]
    pub longitude: f64,
    #[serde(default)]
    pub start_day: Option<String>,
    #[serde(default)]
    pub end_day: Option<String>,
    pub evacuations: ReportedCount,
    #[serde(deserialize_with = "deserialize_count")]
    pub affected_population: i64,
    pub disaster_details: DisasterDetails,
    pub evacuation_plan: EvacuationPlan,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warnings: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ForecastRecord {
    /// Record returned when the model answered but nothing usable could be parsed
    pub fn unpredictable(
        coordinate: &Coordinate,
        location: &ResolvedLocation,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            disaster_name: "Unable to predict".to_string(),
            severity: Severity::Unknown.to_string(),
            country: location.country.clone(),
            state: location.state.clone(),
            location: location.place.clone(),
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
            start_day: None,
            end_day: None,
            evacuations: ReportedCount::from(0),
            affected_population: 0,
            disaster_details: DisasterDetails::default(),
            evacuation_plan: EvacuationPlan::default(),
            warnings: None,
            error: Some(reason.into()),
        }
    }

    /// Record filling the slot of a coordinate whose pipeline failed
    pub fn failed(coordinate: &Coordinate, cause: impl std::fmt::Display) -> Self {
        Self {
            disaster_name: "Prediction Failed".to_string(),
            severity: Severity::Unknown.to_string(),
            country: UNKNOWN.to_string(),
            state: UNKNOWN.to_string(),
            location: coordinate.label(),
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
            start_day: None,
            end_day: None,
            evacuations: ReportedCount::from(0),
            affected_population: 0,
            disaster_details: DisasterDetails {
                description: "Failed to generate prediction".to_string(),
                expected_impact: UNKNOWN.to_string(),
                historical_context: UNKNOWN.to_string(),
                ..DisasterDetails::default()
            },
            evacuation_plan: EvacuationPlan::default(),
            warnings: None,
            error: Some(format!("Prediction failed: {}", cause)),
        }
    }

    /// Pin the record to the coordinate it was requested for
    pub fn pin_to(&mut self, coordinate: &Coordinate) {
        self.latitude = coordinate.latitude;
        self.longitude = coordinate.longitude;
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Accept the model's self-reported coordinate in any shape; it is never trusted
fn deserialize_degrees<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_f64().unwrap_or_default(),
        Value::String(s) => s.trim().parse().unwrap_or_default(),
        _ => 0.0,
    })
}

/// Counts arrive as integers, integral floats or digit strings; anything else is 0
fn deserialize_count<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(count_from_value(&value))
}

/// A count as the model reported it
///
/// The value is coerced leniently, but `exact` remembers whether the model
/// actually wrote a JSON integer. Serializes as the bare number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportedCount {
    pub value: i64,
    pub exact: bool,
}

impl From<i64> for ReportedCount {
    fn from(value: i64) -> Self {
        Self { value, exact: true }
    }
}

impl PartialEq<i64> for ReportedCount {
    fn eq(&self, other: &i64) -> bool {
        self.value == *other
    }
}

impl Serialize for ReportedCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.value)
    }
}

impl<'de> Deserialize<'de> for ReportedCount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let exact = matches!(&value, Value::Number(n) if n.as_i64().is_some());
        Ok(Self {
            value: count_from_value(&value),
            exact,
        })
    }
}

fn count_from_value(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && f.fract() == 0.0)
                    .map(|f| f as i64)
            })
            .unwrap_or(0),
        Value::String(s) => s.trim().replace(',', "").parse().unwrap_or(0),
        _ => 0,
    }
}
