//! Helpers de validación
//!
//! Parseo de timestamps y verificación de intervalos, compartidos por los
//! endpoints de reservas y de disponibilidad.

use chrono::{DateTime, Utc};

use crate::utils::errors::AppError;

/// Parse an RFC-3339 timestamp from a query parameter or field
pub fn validate_datetime(field: &str, value: &str) -> Result<DateTime<Utc>, AppError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::BadRequest(format!("invalid {} format: {}", field, e)))
}

/// Parse a required RFC-3339 parameter, rejecting missing or blank values
pub fn require_datetime(field: &str, value: Option<&str>) -> Result<DateTime<Utc>, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => validate_datetime(field, v),
        _ => Err(AppError::BadRequest(format!("{} is required", field))),
    }
}

/// An interval must start strictly before it ends
pub fn validate_interval(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), AppError> {
    if start >= end {
        return Err(AppError::BadRequest(
            "start_time must be before end_time".to_string(),
        ));
    }
    Ok(())
}
