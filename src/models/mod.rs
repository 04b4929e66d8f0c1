//! Data models
//!
//! Rows of the `vehicles`, `bookings` and `vehicle_status_history` tables and
//! the value types used to change them.

pub mod booking;
pub mod interval;
pub mod vehicle;

pub use booking::{Booking, BookingPatch, BookingStatus, NewBooking};
pub use interval::{BoundaryPolicy, Interval};
pub use vehicle::{NewVehicle, Vehicle, VehicleStatus, VehicleStatusHistory, VehicleStatusPatch};
