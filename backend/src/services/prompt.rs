//! Forecast request builder
//!
//! Pure assembly of the model prompt: a fixed instruction defining the output
//! schema plus a per-call context block.

use chrono::{DateTime, Utc};
use shared::{Coordinate, ResolvedLocation, Severity};

use crate::external::PromptPayload;

/// Timestamp format given to the model (seconds precision, UTC)
pub const CONTEXT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

const OUTPUT_SCHEMA: &str = r#"{
  "disaster_name": "Type of disaster (e.g., Earthquake, Flood, Cyclone, Heat Wave, Wildfire, Tsunami)",
  "severity": "<SEVERITY>",
  "country": "Country name",
  "state": "State or region name",
  "location": "Specific location name",
  "latitude": 0.0,
  "longitude": 0.0,
  "start_day": "YYYY-MM-DD",
  "end_day": "YYYY-MM-DD",
  "evacuations": 0,
  "affected_population": 0,
  "disaster_details": {
    "description": "Detailed description of the predicted disaster",
    "primary_risks": ["risk"],
    "vulnerable_areas": ["area"],
    "expected_impact": "Expected impact on infrastructure, lives and economy",
    "historical_context": "Similar past disasters in this region",
    "contributing_factors": ["factor"]
  },
  "evacuation_plan": {
    "preparation_phase": ["Preparation step"],
    "immediate_actions": ["Action when the disaster is imminent"],
    "during_disaster": ["Action during the disaster"],
    "evacuation_routes": ["Route or assembly point"],
    "post_disaster": ["Recovery step"],
    "emergency_contacts": ["Contact"],
    "essential_supplies": ["Supply item"]
  }
}"#;

/// Fixed system instruction shared by every call
pub fn system_instruction() -> String {
    let scale = Severity::SCALE
        .iter()
        .map(Severity::as_str)
        .collect::<Vec<_>>()
        .join("/");

    format!(
        "You are an expert disaster predictor with access to historical patterns, geological data, and climate trends.\n\
         \n\
         Given location coordinates and the current date, predict the NEXT LIKELY FUTURE disaster for that location.\n\
         \n\
         Rules:\n\
         1. The prediction MUST be for a date strictly after the current date provided.\n\
         2. start_day and end_day use the YYYY-MM-DD format.\n\
         3. start_day falls within the next 3 to 12 months.\n\
         4. end_day reflects the typical duration of the disaster and is not before start_day.\n\
         5. evacuations is one concrete positive integer (e.g. 5000, 25000, 100000), never a range.\n\
         6. Consider the location's historical disaster patterns, geography, climate and season.\n\
         7. severity is one of {scale}.\n\
         8. Provide evacuation steps specific to the predicted disaster type.\n\
         \n\
         Respond with a single JSON object with exactly these fields and no text before or after it:\n\
         \n\
         {schema}",
        scale = scale,
        schema = OUTPUT_SCHEMA.replace("<SEVERITY>", &scale),
    )
}

/// Build the prompt for one coordinate
pub fn build(coordinate: &Coordinate, resolved: &ResolvedLocation, now: DateTime<Utc>) -> PromptPayload {
    let user = format!(
        "Current Date and Time: {now}\n\
         \n\
         Location Details:\n\
         - Coordinates: {lat}, {lon}\n\
         - Location: {place}\n\
         - State: {state}\n\
         - Country: {country}\n\
         - Full Address: {display}",
        now = now.format(CONTEXT_TIME_FORMAT),
        lat = coordinate.latitude,
        lon = coordinate.longitude,
        place = resolved.place,
        state = resolved.state,
        country = resolved.country,
        display = resolved.display_name,
    );

    PromptPayload {
        system: system_instruction(),
        user,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn resolved() -> ResolvedLocation {
        ResolvedLocation {
            place: "Manila".to_string(),
            state: "Metro Manila".to_string(),
            country: "Philippines".to_string(),
            display_name: "Manila, Metro Manila, Philippines".to_string(),
        }
    }

    #[test]
    fn test_context_block() {
        let now = Utc.with_ymd_and_hms(2025, 3, 4, 5, 6, 7).unwrap();
        let payload = build(&Coordinate::new(14.5995, 120.9842), &resolved(), now);

        assert!(payload.user.contains("Current Date and Time: 2025-03-04 05:06:07 UTC"));
        assert!(payload.user.contains("- Coordinates: 14.5995, 120.9842"));
        assert!(payload.user.contains("- Location: Manila"));
        assert!(payload.user.contains("- State: Metro Manila"));
        assert!(payload.user.contains("- Country: Philippines"));
        assert!(payload.user.contains("- Full Address: Manila, Metro Manila, Philippines"));
    }

    #[test]
    fn test_instruction_is_fixed() {
        let now = Utc::now();
        let a = build(&Coordinate::new(0.0, 0.0), &resolved(), now);
        let b = build(&Coordinate::new(45.0, 90.0), &resolved(), now);
        assert_eq!(a.system, b.system);
        assert!(a.system.contains("Low/Moderate/High/Severe/Catastrophic"));
        assert!(a.system.contains("3 to 12 months"));
        assert!(a.system.contains("never a range"));
    }

    #[test]
    fn test_instruction_lists_every_field() {
        let system = system_instruction();
        for field in [
            "disaster_name",
            "severity",
            "start_day",
            "end_day",
            "evacuations",
            "affected_population",
            "primary_risks",
            "contributing_factors",
            "evacuation_routes",
            "essential_supplies",
        ] {
            assert!(system.contains(&format!("\"{}\"", field)), "missing {}", field);
        }
    }
}
