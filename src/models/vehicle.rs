//! Modelo de Vehicle
//!
//! Estado actual del vehículo, su historial y la actualización parcial que
//! aplica el registro de estado. Mapea a las tablas `vehicles` y
//! `vehicle_status_history`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

/// Vehicles below this battery level are not offered
pub const MIN_BATTERY_LEVEL: i32 = 20;

/// Cleanliness value that takes a vehicle out of the availability results
pub const NEEDS_CLEANING: &str = "needs_cleaning";

/// Known values of the free-text `vehicles.status` column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleStatus {
    Available,
    Unavailable,
    Maintenance,
}

impl VehicleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Available => "available",
            VehicleStatus::Unavailable => "unavailable",
            VehicleStatus::Maintenance => "maintenance",
        }
    }
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(VehicleStatus::Available),
            "unavailable" => Ok(VehicleStatus::Unavailable),
            "maintenance" => Ok(VehicleStatus::Maintenance),
            other => Err(format!("unknown vehicle status '{}'", other)),
        }
    }
}

/// Fila de la tabla vehicles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: i32,
    pub model: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub vehicle_type: String,
    pub license_plate: String,
    pub status: String,
    pub location: Option<String>,
    pub battery_level: Option<i32>,
    pub cleanliness_status: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_status_update: DateTime<Utc>,
}

impl Vehicle {
    pub fn parsed_status(&self) -> Option<VehicleStatus> {
        self.status.parse().ok()
    }

    /// Static availability filters, independent of bookings
    pub fn is_operational(&self) -> bool {
        self.parsed_status() == Some(VehicleStatus::Available)
            && self.battery_level.map_or(true, |b| b >= MIN_BATTERY_LEVEL)
            && self
                .cleanliness_status
                .as_deref()
                .map_or(true, |c| c != NEEDS_CLEANING)
    }
}

/// Partial status update; `None` keeps the stored value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehicleStatusPatch {
    pub location: Option<String>,
    pub battery_level: Option<i32>,
    pub cleanliness_status: Option<String>,
}

/// Append-only history row holding the resolved values written by one status update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct VehicleStatusHistory {
    pub id: i64,
    pub vehicle_id: i32,
    pub location: Option<String>,
    pub battery_level: Option<i32>,
    pub cleanliness_status: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

/// Data needed to register a vehicle (seeding and tests)
#[derive(Debug, Clone)]
pub struct NewVehicle {
    pub model: String,
    pub vehicle_type: String,
    pub license_plate: String,
    pub status: VehicleStatus,
    pub location: Option<String>,
    pub battery_level: Option<i32>,
    pub cleanliness_status: Option<String>,
}

impl NewVehicle {
    pub fn available(model: &str, license_plate: &str) -> Self {
        Self {
            model: model.to_string(),
            vehicle_type: "car".to_string(),
            license_plate: license_plate.to_string(),
            status: VehicleStatus::Available,
            location: None,
            battery_level: None,
            cleanliness_status: None,
        }
    }
}
