use std::sync::Arc;

use tracing::info;
use validator::Validate;

use crate::dto::vehicle_dto::{AvailabilityQuery, UpdateVehicleStatusRequest};
use crate::models::{Interval, Vehicle, VehicleStatusHistory};
use crate::repositories::VehicleRepository;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::{require_datetime, validate_interval};

/// Availability search and the vehicle status ledger
pub struct VehicleController {
    repository: Arc<dyn VehicleRepository>,
}

impl VehicleController {
    pub fn new(repository: Arc<dyn VehicleRepository>) -> Self {
        Self { repository }
    }

    pub async fn find_available(&self, query: AvailabilityQuery) -> AppResult<Vec<Vehicle>> {
        let start = require_datetime("start_time", query.start_time.as_deref())?;
        let end = require_datetime("end_time", query.end_time.as_deref())?;
        validate_interval(start, end)?;

        let vehicles = self.repository.find_available(Interval::new(start, end)).await?;

        info!(%start, %end, count = vehicles.len(), "Retrieved available vehicles");
        Ok(vehicles)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Vehicle> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(AppError::VehicleNotFound(id))
    }

    pub async fn update_status(
        &self,
        id: i32,
        request: UpdateVehicleStatusRequest,
    ) -> AppResult<VehicleStatusHistory> {
        request.validate()?;

        let entry = self.repository.update_status(id, request.into()).await?;

        info!(
            vehicle_id = id,
            history_id = entry.id,
            battery_level = ?entry.battery_level,
            cleanliness_status = ?entry.cleanliness_status,
            "Vehicle status updated"
        );
        Ok(entry)
    }

    pub async fn history(&self, id: i32) -> AppResult<Vec<VehicleStatusHistory>> {
        self.repository.status_history(id).await
    }
}
