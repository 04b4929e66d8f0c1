use serde::Deserialize;
use validator::Validate;

use crate::models::VehicleStatusPatch;

// Query string of the availability search; both parameters are required RFC-3339 timestamps
#[derive(Debug, Default, Deserialize)]
pub struct AvailabilityQuery {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

// Telemetry update; absent or null fields keep their stored value
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateVehicleStatusRequest {
    #[validate(length(min = 1, max = 255))]
    pub location: Option<String>,

    #[validate(range(min = 0, max = 100))]
    pub battery_level: Option<i32>,

    #[validate(length(min = 1, max = 50))]
    pub cleanliness_status: Option<String>,
}

impl From<UpdateVehicleStatusRequest> for VehicleStatusPatch {
    fn from(request: UpdateVehicleStatusRequest) -> Self {
        Self {
            location: request.location,
            battery_level: request.battery_level,
            cleanliness_status: request.cleanliness_status,
        }
    }
}
