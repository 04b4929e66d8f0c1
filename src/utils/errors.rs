//! Sistema de manejo de errores
//!
//! Define todos los errores del servicio y su conversión a un status HTTP y
//! al envelope `{success: false, error}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    BoxError, Json,
};
use serde_json::json;
use thiserror::Error;

/// SQLSTATE raised by Postgres when an exclusion constraint rejects a row.
const EXCLUSION_VIOLATION: &str = "23P01";

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("{0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("JWT error: {0}")]
    Jwt(String),

    /// Ownership and existence are deliberately not distinguished.
    #[error("booking not found or unauthorized")]
    BookingNotFoundOrUnauthorized,

    #[error("booking cannot be updated in its current status")]
    BookingNotUpdatable,

    #[error("vehicle {0} not found")]
    VehicleNotFound(i32),

    #[error("{0}")]
    Conflict(String),

    #[error("request timed out")]
    Timeout,

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) | AppError::Jwt(_) => StatusCode::UNAUTHORIZED,
            AppError::BookingNotFoundOrUnauthorized | AppError::VehicleNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            AppError::BookingNotUpdatable | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Timeout => StatusCode::REQUEST_TIMEOUT,
        }
    }

    /// Message exposed to the caller. Storage and internal details stay in the logs.
    fn public_message(&self) -> String {
        match self {
            AppError::Database(_) | AppError::Internal(_) => "internal server error".to_string(),
            AppError::Jwt(_) => "invalid token".to_string(),
            AppError::Validation(e) => format!("invalid request: {}", e),
            other => other.to_string(),
        }
    }
}

/// Error envelope returned by every failing endpoint
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            AppError::Database(e) => tracing::error!(error = ?e, "❌ Error de persistencia"),
            AppError::Internal(msg) => tracing::error!(%msg, "❌ Error interno"),
            AppError::Jwt(detail) => tracing::warn!(%detail, "Token rechazado"),
            other if status.is_client_error() => tracing::debug!(error = %other, "Request rechazado"),
            _ => {}
        }

        let body = ErrorResponse {
            success: false,
            error: self.public_message(),
        };

        (status, Json(json!(body))).into_response()
    }
}

/// Typed result for fallible operations
pub type AppResult<T> = Result<T, AppError>;

/// Errors raised by the tower middleware stack (`HandleErrorLayer`)
pub async fn handle_middleware_error(err: BoxError) -> AppError {
    if err.is::<tower::timeout::error::Elapsed>() {
        AppError::Timeout
    } else {
        AppError::Internal(format!("unhandled middleware error: {}", err))
    }
}

/// Map an exclusion-constraint violation to a booking conflict, keep everything else as a
/// persistence error.
pub fn map_booking_write_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.code().as_deref() == Some(EXCLUSION_VIOLATION) {
            return booking_conflict_error();
        }
    }
    AppError::Database(e)
}

pub fn booking_conflict_error() -> AppError {
    AppError::Conflict("vehicle is already booked for an overlapping interval".to_string())
}
