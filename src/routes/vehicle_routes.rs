use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    routing::{get, put},
    Json, Router,
};
use serde_json::Value;

use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::vehicle_dto::{AvailabilityQuery, UpdateVehicleStatusRequest};
use crate::dto::ApiResponse;
use crate::models::{Vehicle, VehicleStatusHistory};
use crate::routes::{json_body, path_id};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/available", get(available_vehicles))
        .route("/:id", get(get_vehicle))
        .route("/:id/status", put(update_vehicle_status))
        .route("/:id/history", get(vehicle_status_history))
}

async fn available_vehicles(
    State(state): State<AppState>,
    query: Result<Query<AvailabilityQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<Vehicle>>>, AppError> {
    let Query(query) =
        query.map_err(|e| AppError::BadRequest(format!("invalid query: {}", e.body_text())))?;
    let controller = VehicleController::new(state.vehicles.clone());
    let vehicles = controller.find_available(query).await?;
    Ok(Json(ApiResponse::success(vehicles)))
}

async fn get_vehicle(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    let id = path_id(id, "vehicle")?;
    let controller = VehicleController::new(state.vehicles.clone());
    let vehicle = controller.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(vehicle)))
}

async fn update_vehicle_status(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateVehicleStatusRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let id = path_id(id, "vehicle")?;
    let request = json_body(payload)?;
    let controller = VehicleController::new(state.vehicles.clone());
    controller.update_status(id, request).await?;
    Ok(Json(ApiResponse::message("vehicle status updated successfully")))
}

async fn vehicle_status_history(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<ApiResponse<Vec<VehicleStatusHistory>>>, AppError> {
    let id = path_id(id, "vehicle")?;
    let controller = VehicleController::new(state.vehicles.clone());
    let history = controller.history(id).await?;
    Ok(Json(ApiResponse::success(history)))
}
