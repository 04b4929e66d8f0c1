use std::sync::Arc;

use tracing::info;

use crate::dto::booking_dto::{CreateBookingRequest, UpdateBookingRequest};
use crate::models::{Booking, BookingStatus, NewBooking};
use crate::repositories::BookingRepository;
use crate::utils::errors::AppResult;
use crate::utils::validation::validate_interval;

/// Reservation lifecycle. Every mutation is scoped to the calling user.
pub struct BookingController {
    repository: Arc<dyn BookingRepository>,
}

impl BookingController {
    pub fn new(repository: Arc<dyn BookingRepository>) -> Self {
        Self { repository }
    }

    pub async fn create(&self, user_id: i32, request: CreateBookingRequest) -> AppResult<Booking> {
        validate_interval(request.start_time, request.end_time)?;

        let booking = self
            .repository
            .create(NewBooking {
                user_id,
                vehicle_id: request.vehicle_id,
                start_time: request.start_time,
                end_time: request.end_time,
            })
            .await?;

        info!(
            booking_id = booking.id,
            user_id,
            vehicle_id = booking.vehicle_id,
            "Booking created"
        );
        Ok(booking)
    }

    pub async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<Booking>> {
        self.repository.find_by_user(user_id).await
    }

    pub async fn update(
        &self,
        booking_id: i32,
        user_id: i32,
        request: UpdateBookingRequest,
    ) -> AppResult<Booking> {
        let booking = self
            .repository
            .update_times(booking_id, user_id, request.into())
            .await?;

        info!(booking_id, user_id, "Booking updated");
        Ok(booking)
    }

    pub async fn cancel(&self, booking_id: i32, user_id: i32) -> AppResult<Booking> {
        self.transition(booking_id, user_id, BookingStatus::Cancelled)
            .await
    }

    pub async fn confirm(&self, booking_id: i32, user_id: i32) -> AppResult<Booking> {
        self.transition(booking_id, user_id, BookingStatus::Confirmed)
            .await
    }

    pub async fn complete(&self, booking_id: i32, user_id: i32) -> AppResult<Booking> {
        self.transition(booking_id, user_id, BookingStatus::Completed)
            .await
    }

    async fn transition(
        &self,
        booking_id: i32,
        user_id: i32,
        to: BookingStatus,
    ) -> AppResult<Booking> {
        let booking = self.repository.transition(booking_id, user_id, to).await?;

        info!(booking_id, user_id, status = %to, "Booking status changed");
        Ok(booking)
    }
}
