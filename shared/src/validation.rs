//! Validation utilities for the BuckTrax platform

use std::collections::BTreeMap;

use crate::models::Season;
use crate::types::GpsCoordinates;

// ============================================================================
// Weight Validations
// ============================================================================

/// Validate an influence weight is inside [0, 1]
pub fn validate_weight(weight: f64) -> Result<(), &'static str> {
    if weight.is_nan() {
        return Err("Weight must be a number");
    }
    if !(0.0..=1.0).contains(&weight) {
        return Err("Weight must be between 0 and 1");
    }
    Ok(())
}

/// Validate every seasonal weight, reporting the first offending season
pub fn validate_seasonal_weights(
    weights: &BTreeMap<Season, f64>,
) -> Result<(), (Season, &'static str)> {
    for (season, weight) in weights {
        validate_weight(*weight).map_err(|e| (*season, e))?;
    }
    Ok(())
}

// ============================================================================
// Calendar Validations
// ============================================================================

pub fn is_valid_month(month: u32) -> bool {
    (1..=12).contains(&month)
}

/// Validate a custom month set for a season override
pub fn validate_months(months: &[u32]) -> Result<(), &'static str> {
    if months.is_empty() {
        return Err("At least one month is required");
    }
    if !months.iter().all(|m| is_valid_month(*m)) {
        return Err("Months must be between 1 and 12");
    }
    Ok(())
}

/// Validate a fixed UTC offset in minutes (UTC-12:00 to UTC+14:00)
pub fn validate_utc_offset_minutes(offset: i32) -> Result<(), &'static str> {
    if !(-720..=840).contains(&offset) {
        return Err("UTC offset must be between -12:00 and +14:00");
    }
    Ok(())
}

// ============================================================================
// Location Validations
// ============================================================================

/// Validate latitude/longitude are on the globe
pub fn validate_coordinates(coordinates: &GpsCoordinates) -> Result<(), &'static str> {
    if !(-90.0..=90.0).contains(&coordinates.latitude) {
        return Err("Latitude must be between -90 and 90");
    }
    if !(-180.0..=180.0).contains(&coordinates.longitude) {
        return Err("Longitude must be between -180 and 180");
    }
    Ok(())
}
