//! Data access
//!
//! The repository traits are the storage seam of the service. Postgres is the
//! production backend; the in-memory store backs local development and the
//! test suite. Each trait method is one atomic operation: implementations must
//! never leave a half-applied mutation visible to later reads.

use async_trait::async_trait;

use crate::models::{
    Booking, BookingPatch, BookingStatus, Interval, NewBooking, Vehicle, VehicleStatusHistory,
    VehicleStatusPatch,
};
use crate::utils::errors::AppResult;

pub mod booking_repository;
pub mod memory;
pub mod vehicle_repository;

pub use booking_repository::PgBookingRepository;
pub use memory::InMemoryStore;
pub use vehicle_repository::PgVehicleRepository;

#[async_trait]
pub trait VehicleRepository: Send + Sync {
    /// Operational vehicles with no active booking overlapping `window`, ordered by id
    async fn find_available(&self, window: Interval) -> AppResult<Vec<Vehicle>>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Vehicle>>;

    /// Merge `patch` into the snapshot and append the resolved values to the history.
    /// Fails with `VehicleNotFound` without touching the history.
    async fn update_status(
        &self,
        id: i32,
        patch: VehicleStatusPatch,
    ) -> AppResult<VehicleStatusHistory>;

    /// History rows, newest first
    async fn status_history(&self, id: i32) -> AppResult<Vec<VehicleStatusHistory>>;

    async fn ping(&self) -> AppResult<()>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Insert a pending booking after re-checking overlap in the same atomic step
    async fn create(&self, booking: NewBooking) -> AppResult<Booking>;

    /// Bookings of a user with their vehicle model, newest first
    async fn find_by_user(&self, user_id: i32) -> AppResult<Vec<Booking>>;

    /// Apply a partial time change to an active booking owned by `user_id`
    async fn update_times(
        &self,
        booking_id: i32,
        user_id: i32,
        patch: BookingPatch,
    ) -> AppResult<Booking>;

    /// Move a booking owned by `user_id` to `to` if the state machine allows it
    async fn transition(
        &self,
        booking_id: i32,
        user_id: i32,
        to: BookingStatus,
    ) -> AppResult<Booking>;
}
