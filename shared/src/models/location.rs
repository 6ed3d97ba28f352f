//! Resolved location models

use serde::{Deserialize, Serialize};

use crate::types::Coordinate;

/// Sentinel for any address component the geocoder could not supply
pub const UNKNOWN: &str = "Unknown";

/// Human-readable place for a coordinate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolvedLocation {
    pub place: String,
    pub state: String,
    pub country: String,
    pub display_name: String,
}

impl ResolvedLocation {
    /// Location used when reverse geocoding fails or returns nothing
    pub fn fallback(coordinate: &Coordinate) -> Self {
        Self {
            place: coordinate.label(),
            state: UNKNOWN.to_string(),
            country: UNKNOWN.to_string(),
            display_name: format!(
                "Location at {}, {}",
                coordinate.latitude, coordinate.longitude
            ),
        }
    }
}
