//! Common types used across the service

use serde::{Deserialize, Serialize};
use validator::Validate;

/// GPS coordinates of a point of interest
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Validate)]
pub struct Coordinate {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Label used wherever a place name could not be resolved
    pub fn label(&self) -> String {
        format!("Coordinates: {}, {}", self.latitude, self.longitude)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_ranges() {
        assert!(Coordinate::new(18.7883, 98.9853).validate().is_ok());
        assert!(Coordinate::new(-90.0, 180.0).validate().is_ok());
        assert!(Coordinate::new(90.5, 0.0).validate().is_err());
        assert!(Coordinate::new(0.0, -180.5).validate().is_err());
    }

    #[test]
    fn test_coordinate_label() {
        let coord = Coordinate::new(35.6762, 139.6503);
        assert_eq!(coord.label(), "Coordinates: 35.6762, 139.6503");
        assert_eq!(coord.to_string(), "(35.6762, 139.6503)");
    }
}
