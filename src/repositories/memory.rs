//! In-memory storage backend
//!
//! Implements both repository traits over a single `RwLock`, so every
//! operation is atomic with respect to every other. Used for local development
//! (`STORAGE_BACKEND=memory`) and by the test suite.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::{
    Booking, BookingPatch, BookingStatus, BoundaryPolicy, Interval, NewBooking, NewVehicle,
    Vehicle, VehicleStatus, VehicleStatusHistory, VehicleStatusPatch,
};
use crate::repositories::{BookingRepository, VehicleRepository};
use crate::utils::errors::{booking_conflict_error, AppError, AppResult};
use crate::utils::validation::validate_interval;

#[derive(Debug, Default)]
struct MemoryState {
    vehicles: BTreeMap<i32, Vehicle>,
    bookings: BTreeMap<i32, Booking>,
    history: Vec<VehicleStatusHistory>,
    next_vehicle_id: i32,
    next_booking_id: i32,
    next_history_id: i64,
}

impl MemoryState {
    fn has_overlap(
        &self,
        vehicle_id: i32,
        window: &Interval,
        exclude_booking: Option<i32>,
        policy: BoundaryPolicy,
    ) -> bool {
        self.bookings.values().any(|b| {
            b.vehicle_id == vehicle_id
                && b.status.is_active()
                && Some(b.id) != exclude_booking
                && b.interval().overlaps(window, policy)
        })
    }

    fn owned_booking_mut(&mut self, booking_id: i32, user_id: i32) -> AppResult<&mut Booking> {
        self.bookings
            .get_mut(&booking_id)
            .filter(|b| b.user_id == user_id)
            .ok_or(AppError::BookingNotFoundOrUnauthorized)
    }
}

#[derive(Debug, Clone)]
pub struct InMemoryStore {
    state: Arc<RwLock<MemoryState>>,
    policy: BoundaryPolicy,
}

impl InMemoryStore {
    pub fn new(policy: BoundaryPolicy) -> Self {
        Self {
            state: Arc::new(RwLock::new(MemoryState::default())),
            policy,
        }
    }

    pub async fn add_vehicle(&self, new: NewVehicle) -> Vehicle {
        let mut state = self.state.write().await;
        state.next_vehicle_id += 1;

        let now = Utc::now();
        let vehicle = Vehicle {
            id: state.next_vehicle_id,
            model: new.model,
            vehicle_type: new.vehicle_type,
            license_plate: new.license_plate,
            status: new.status.as_str().to_string(),
            location: new.location,
            battery_level: new.battery_level,
            cleanliness_status: new.cleanliness_status,
            created_at: now,
            last_status_update: now,
        };
        state.vehicles.insert(vehicle.id, vehicle.clone());
        vehicle
    }

    /// Small fleet for running the service without a database
    pub async fn seed_demo_fleet(&self) {
        let fleet = [
            ("Renault Zoe", "EV-101-ZO", Some(85)),
            ("Tesla Model 3", "EV-202-TM", Some(64)),
            ("Peugeot e-208", "EV-303-PE", Some(12)),
        ];
        for (model, plate, battery) in fleet {
            let mut vehicle = NewVehicle::available(model, plate);
            vehicle.battery_level = battery;
            vehicle.cleanliness_status = Some("clean".to_string());
            self.add_vehicle(vehicle).await;
        }

        let mut in_shop = NewVehicle::available("Nissan Leaf", "EV-404-NL");
        in_shop.status = VehicleStatus::Maintenance;
        self.add_vehicle(in_shop).await;
    }

    pub async fn history_len(&self) -> usize {
        self.state.read().await.history.len()
    }
}

#[async_trait]
impl VehicleRepository for InMemoryStore {
    async fn find_available(&self, window: Interval) -> AppResult<Vec<Vehicle>> {
        let state = self.state.read().await;

        Ok(state
            .vehicles
            .values()
            .filter(|v| v.is_operational())
            .filter(|v| !state.has_overlap(v.id, &window, None, self.policy))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Vehicle>> {
        Ok(self.state.read().await.vehicles.get(&id).cloned())
    }

    async fn update_status(
        &self,
        id: i32,
        patch: VehicleStatusPatch,
    ) -> AppResult<VehicleStatusHistory> {
        let mut state = self.state.write().await;

        let vehicle = state
            .vehicles
            .get_mut(&id)
            .ok_or(AppError::VehicleNotFound(id))?;

        let now = Utc::now();
        if patch.location.is_some() {
            vehicle.location = patch.location;
        }
        if patch.battery_level.is_some() {
            vehicle.battery_level = patch.battery_level;
        }
        if patch.cleanliness_status.is_some() {
            vehicle.cleanliness_status = patch.cleanliness_status;
        }
        vehicle.last_status_update = now;

        let (location, battery_level, cleanliness_status) = (
            vehicle.location.clone(),
            vehicle.battery_level,
            vehicle.cleanliness_status.clone(),
        );

        state.next_history_id += 1;
        let entry = VehicleStatusHistory {
            id: state.next_history_id,
            vehicle_id: id,
            location,
            battery_level,
            cleanliness_status,
            recorded_at: now,
        };
        state.history.push(entry.clone());

        Ok(entry)
    }

    async fn status_history(&self, id: i32) -> AppResult<Vec<VehicleStatusHistory>> {
        let state = self.state.read().await;
        if !state.vehicles.contains_key(&id) {
            return Err(AppError::VehicleNotFound(id));
        }

        Ok(state
            .history
            .iter()
            .rev()
            .filter(|h| h.vehicle_id == id)
            .cloned()
            .collect())
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

#[async_trait]
impl BookingRepository for InMemoryStore {
    async fn create(&self, booking: NewBooking) -> AppResult<Booking> {
        let mut state = self.state.write().await;

        if !state.vehicles.contains_key(&booking.vehicle_id) {
            return Err(AppError::VehicleNotFound(booking.vehicle_id));
        }
        if state.has_overlap(booking.vehicle_id, &booking.interval(), None, self.policy) {
            return Err(booking_conflict_error());
        }

        state.next_booking_id += 1;
        let now = Utc::now();
        let created = Booking {
            id: state.next_booking_id,
            user_id: booking.user_id,
            vehicle_id: booking.vehicle_id,
            vehicle_model: None,
            start_time: booking.start_time,
            end_time: booking.end_time,
            status: BookingStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        state.bookings.insert(created.id, created.clone());

        Ok(created)
    }

    async fn find_by_user(&self, user_id: i32) -> AppResult<Vec<Booking>> {
        let state = self.state.read().await;

        let mut bookings: Vec<Booking> = state
            .bookings
            .values()
            .filter(|b| b.user_id == user_id)
            .filter_map(|b| {
                // mirrors the inner join on vehicles
                let vehicle = state.vehicles.get(&b.vehicle_id)?;
                let mut row = b.clone();
                row.vehicle_model = Some(vehicle.model.clone());
                Some(row)
            })
            .collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(bookings)
    }

    async fn update_times(
        &self,
        booking_id: i32,
        user_id: i32,
        patch: BookingPatch,
    ) -> AppResult<Booking> {
        let mut state = self.state.write().await;

        let current = state.owned_booking_mut(booking_id, user_id)?.clone();
        if !current.status.is_active() {
            return Err(AppError::BookingNotUpdatable);
        }

        let resolved = patch.resolve(&current);
        validate_interval(resolved.start, resolved.end)?;

        if resolved != current.interval()
            && state.has_overlap(current.vehicle_id, &resolved, Some(current.id), self.policy)
        {
            return Err(booking_conflict_error());
        }

        let booking = state.owned_booking_mut(booking_id, user_id)?;
        booking.start_time = resolved.start;
        booking.end_time = resolved.end;
        booking.updated_at = Utc::now();

        Ok(booking.clone())
    }

    async fn transition(
        &self,
        booking_id: i32,
        user_id: i32,
        to: BookingStatus,
    ) -> AppResult<Booking> {
        let mut state = self.state.write().await;

        let booking = state.owned_booking_mut(booking_id, user_id)?;
        if !booking.status.can_transition_to(to) {
            return Err(AppError::BookingNotUpdatable);
        }

        booking.status = to;
        booking.updated_at = Utc::now();

        Ok(booking.clone())
    }
}
