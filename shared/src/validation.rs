//! Validation utilities for disaster forecasts
//!
//! Checks are advisory: a violation appends a warning to the record and never
//! rejects it.

use chrono::{NaiveDate, Utc};

use crate::models::{ForecastRecord, ReportedCount};

/// Date format the model is instructed to use for `start_day` and `end_day`
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub const WARN_INVALID_START: &str = "Invalid start date format";
pub const WARN_START_NOT_FUTURE: &str = "Start date is not in the future";
pub const WARN_INVALID_END: &str = "Invalid end date format";
pub const WARN_END_BEFORE_START: &str = "End date is before start date";
pub const WARN_EVACUATIONS: &str = "Evacuation number should be a positive integer";

// ============================================================================
// Date Checks
// ============================================================================

/// Parse a forecast date, tolerating surrounding whitespace
pub fn parse_forecast_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// Check the predicted start date against today
///
/// A missing start date has nothing to check; a present one must parse and lie
/// strictly after `today`.
pub fn check_start_day(start_day: Option<&str>, today: NaiveDate) -> Result<(), &'static str> {
    let Some(raw) = start_day else {
        return Ok(());
    };
    match parse_forecast_date(raw) {
        None => Err(WARN_INVALID_START),
        Some(start) if start <= today => Err(WARN_START_NOT_FUTURE),
        Some(_) => Ok(()),
    }
}

/// Check the predicted end date
///
/// A present end date must parse whatever the state of the start date.
/// Ordering is only evaluated when both dates parse.
pub fn check_end_day(start_day: Option<&str>, end_day: Option<&str>) -> Result<(), &'static str> {
    let Some(raw_end) = end_day else {
        return Ok(());
    };
    let end = parse_forecast_date(raw_end).ok_or(WARN_INVALID_END)?;
    match start_day.and_then(parse_forecast_date) {
        Some(start) if end < start => Err(WARN_END_BEFORE_START),
        _ => Ok(()),
    }
}

// ============================================================================
// Count Checks
// ============================================================================

/// Evacuations must be reported as a positive integer literal
pub fn check_evacuations(evacuations: ReportedCount) -> Result<(), &'static str> {
    if !evacuations.exact || evacuations.value <= 0 {
        return Err(WARN_EVACUATIONS);
    }
    Ok(())
}

// ============================================================================
// Record Validation
// ============================================================================

/// Run every check against `record`, attaching warnings for violations
///
/// `warnings` is left as `None` when all checks pass.
pub fn validate_forecast(mut record: ForecastRecord, today: NaiveDate) -> ForecastRecord {
    let start_day = record.start_day.as_deref();
    let end_day = record.end_day.as_deref();

    let warnings: Vec<String> = [
        check_start_day(start_day, today),
        check_end_day(start_day, end_day),
        check_evacuations(record.evacuations),
    ]
    .into_iter()
    .filter_map(Result::err)
    .map(str::to_string)
    .collect();

    if !warnings.is_empty() {
        record.warnings = Some(warnings);
    }
    record
}

/// Validate against the current UTC date
pub fn validate_forecast_now(record: ForecastRecord) -> ForecastRecord {
    validate_forecast(record, Utc::now().date_naive())
}
