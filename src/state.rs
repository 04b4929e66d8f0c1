//! Shared application state
//!
//! Este módulo define el estado compartido que se pasa a cada handler de Axum.
//! Los backends de almacenamiento van detrás de los traits de repositorio.

use sqlx::PgPool;
use std::sync::Arc;

use crate::config::EnvironmentConfig;
use crate::repositories::{
    BookingRepository, InMemoryStore, PgBookingRepository, PgVehicleRepository, VehicleRepository,
};
use crate::utils::jwt::JwtConfig;

#[derive(Clone)]
pub struct AppState {
    pub vehicles: Arc<dyn VehicleRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub jwt: JwtConfig,
    pub config: EnvironmentConfig,
}

impl AppState {
    pub fn new(
        vehicles: Arc<dyn VehicleRepository>,
        bookings: Arc<dyn BookingRepository>,
        config: EnvironmentConfig,
    ) -> Self {
        Self {
            vehicles,
            bookings,
            jwt: JwtConfig::from(&config),
            config,
        }
    }

    pub fn postgres(pool: PgPool, config: EnvironmentConfig) -> Self {
        let policy = config.boundary_policy;
        Self::new(
            Arc::new(PgVehicleRepository::new(pool.clone(), policy)),
            Arc::new(PgBookingRepository::new(pool, policy)),
            config,
        )
    }

    /// Both traits are served by the same store so bookings and vehicles stay consistent
    pub fn in_memory(store: InMemoryStore, config: EnvironmentConfig) -> Self {
        Self::new(Arc::new(store.clone()), Arc::new(store), config)
    }
}
