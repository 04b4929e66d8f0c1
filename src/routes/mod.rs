use axum::extract::{
    rejection::{JsonRejection, PathRejection},
    Json, Path,
};
use serde::de::DeserializeOwned;

use crate::utils::errors::{AppError, AppResult};

pub mod booking_routes;
pub mod health_routes;
pub mod vehicle_routes;

/// Unwrap a numeric path id, answering 400 instead of axum's plain-text rejection
pub(crate) fn path_id(path: Result<Path<i32>, PathRejection>, resource: &str) -> AppResult<i32> {
    path.map(|Path(id)| id)
        .map_err(|_| AppError::BadRequest(format!("invalid {} ID", resource)))
}

/// Unwrap a JSON body, answering 400 in the standard error envelope
pub(crate) fn json_body<T: DeserializeOwned>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::BadRequest(format!("invalid request body: {}", rejection.body_text())))
}
