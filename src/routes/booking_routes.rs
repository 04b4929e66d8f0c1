use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::Value;

use crate::controllers::booking_controller::BookingController;
use crate::dto::booking_dto::{CreateBookingRequest, UpdateBookingRequest};
use crate::dto::ApiResponse;
use crate::middleware::AuthenticatedUser;
use crate::models::Booking;
use crate::routes::{json_body, path_id};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_booking_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_booking))
        .route("/my", get(my_bookings))
        .route("/:id", put(update_booking).delete(cancel_booking))
        .route("/:id/confirm", put(confirm_booking))
        .route("/:id/complete", put(complete_booking))
}

async fn create_booking(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    payload: Result<Json<CreateBookingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Booking>>), AppError> {
    let request = json_body(payload)?;
    let controller = BookingController::new(state.bookings.clone());
    let booking = controller.create(user.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(booking))))
}

async fn my_bookings(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<ApiResponse<Vec<Booking>>>, AppError> {
    let controller = BookingController::new(state.bookings.clone());
    let bookings = controller.list_for_user(user.user_id).await?;
    Ok(Json(ApiResponse::success(bookings)))
}

async fn update_booking(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateBookingRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let id = path_id(id, "booking")?;
    let request = json_body(payload)?;
    let controller = BookingController::new(state.bookings.clone());
    controller.update(id, user.user_id, request).await?;
    Ok(Json(ApiResponse::message("booking updated successfully")))
}

async fn cancel_booking(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let id = path_id(id, "booking")?;
    let controller = BookingController::new(state.bookings.clone());
    controller.cancel(id, user.user_id).await?;
    Ok(Json(ApiResponse::message("booking cancelled successfully")))
}

async fn confirm_booking(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let id = path_id(id, "booking")?;
    let controller = BookingController::new(state.bookings.clone());
    controller.confirm(id, user.user_id).await?;
    Ok(Json(ApiResponse::message("booking confirmed successfully")))
}

async fn complete_booking(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let id = path_id(id, "booking")?;
    let controller = BookingController::new(state.bookings.clone());
    controller.complete(id, user.user_id).await?;
    Ok(Json(ApiResponse::message("booking completed successfully")))
}
