//! Shared range validation helpers.
//!
//! Provides reusable range-checking functions used by the record, location
//! and analytics modules.

use crate::error::CoreError;

/// Validate that a float lies within `[min, max]`.
///
/// NaN is always rejected. Returns a `CoreError::Validation` naming the field.
pub fn validate_f64_range(value: f64, min: f64, max: f64, name: &str) -> Result<(), CoreError> {
    if !(min..=max).contains(&value) {
        return Err(CoreError::Validation(format!(
            "{name} must be between {min} and {max}, got {value}"
        )));
    }
    Ok(())
}

/// Validate that a count does not exceed `max`.
pub fn validate_count_max(value: u32, max: u32, name: &str) -> Result<(), CoreError> {
    if value > max {
        return Err(CoreError::Validation(format!(
            "{name} must be at most {max}, got {value}"
        )));
    }
    Ok(())
}
