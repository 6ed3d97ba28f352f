//! Structured extraction of forecasts from raw model text
//!
//! Two-stage parse: strict deserialization of the whole text, then a recovery
//! pass over brace-delimited substrings. When both fail the caller receives a
//! synthesized "Unable to predict" record instead of an error.

use shared::{Coordinate, ForecastRecord, ResolvedLocation, Severity};

use crate::error::ExtractionError;

/// Result of parsing raw model text
#[derive(Debug)]
pub enum ParseOutcome {
    /// The whole text was a schema-conforming JSON object
    Parsed(ForecastRecord),
    /// A JSON object embedded in surrounding text conformed to the schema
    Recovered(ForecastRecord),
    Failed(ExtractionError),
}

/// Parse raw model text into a forecast record
pub fn parse_forecast(text: &str) -> ParseOutcome {
    let strict_error = match serde_json::from_str::<ForecastRecord>(text) {
        Ok(record) => return ParseOutcome::Parsed(record),
        Err(e) => e,
    };

    let candidates = object_candidates(text);
    if candidates.is_empty() {
        return ParseOutcome::Failed(ExtractionError::NoJsonObject);
    }

    let mut last_error = strict_error.to_string();
    for candidate in candidates {
        match serde_json::from_str::<ForecastRecord>(candidate) {
            Ok(record) => return ParseOutcome::Recovered(record),
            Err(e) => last_error = e.to_string(),
        }
    }

    ParseOutcome::Failed(ExtractionError::Schema(last_error))
}

/// Extract a record for `coordinate`, never failing
///
/// The model's own latitude/longitude are discarded in favour of the
/// requesting coordinate. Recognized severities are normalized to the scale's
/// casing; anything else is kept as written.
pub fn extract(text: &str, coordinate: &Coordinate, resolved: &ResolvedLocation) -> ForecastRecord {
    let mut record = match parse_forecast(text) {
        ParseOutcome::Parsed(record) => record,
        ParseOutcome::Recovered(record) => {
            tracing::debug!("Recovered embedded JSON from model response for {}", coordinate);
            record
        }
        ParseOutcome::Failed(e) => {
            tracing::warn!("Could not extract forecast for {}: {}", coordinate, e);
            return ForecastRecord::unpredictable(
                coordinate,
                resolved,
                format!("Failed to parse model response: {}", e),
            );
        }
    };

    // Annotations are ours to set, not the model's
    record.warnings = None;
    record.error = None;
    if let Ok(severity) = record.severity.parse::<Severity>() {
        record.severity = severity.to_string();
    }
    record.pin_to(coordinate);
    record
}

/// Brace-delimited substrings worth a strict parse, largest first
///
/// Balanced top-level objects are found with a scan that ignores braces inside
/// JSON strings. The greedy span from the first `{` to the last `}` is added
/// last to cover unbalanced text.
fn object_candidates(text: &str) -> Vec<&str> {
    let mut candidates = balanced_objects(text);
    candidates.sort_by_key(|c| std::cmp::Reverse(c.len()));

    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if start < end {
            let greedy = &text[start..=end];
            if !candidates.contains(&greedy) {
                candidates.push(greedy);
            }
        }
    }

    candidates
}

fn balanced_objects(text: &str) -> Vec<&str> {
    let mut objects = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, b) in text.bytes().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' if depth > 0 => in_string = true,
            b'{' => {
                if depth == 0 {
                    start = i;
                }
                depth += 1;
            }
            b'}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    objects.push(&text[start..=i]);
                }
            }
            _ => {}
        }
    }

    objects
}
