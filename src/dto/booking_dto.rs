use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::BookingPatch;

// Request to create a booking
#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub vehicle_id: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

// Request to change a booking's times; absent or null fields are left unchanged
#[derive(Debug, Default, Deserialize)]
pub struct UpdateBookingRequest {
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl From<UpdateBookingRequest> for BookingPatch {
    fn from(request: UpdateBookingRequest) -> Self {
        Self {
            start_time: request.start_time,
            end_time: request.end_time,
        }
    }
}
