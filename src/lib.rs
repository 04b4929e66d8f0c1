//! Servicio de disponibilidad y reservas de vehículos
//!
//! API REST del servicio de vehículos de la plataforma de car-sharing:
//! búsqueda de disponibilidad, ciclo de vida de las reservas y registro de
//! estado de los vehículos.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod utils;

use axum::{error_handling::HandleErrorLayer, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::EnvironmentConfig;
use crate::middleware::{cors_layer, require_auth};
use crate::state::AppState;
use crate::utils::errors::handle_middleware_error;

/// Build the full router: authenticated API under `/api`, health probe at `/health`
pub fn create_app(state: AppState) -> Router {
    let api = Router::new()
        .nest("/vehicles", routes::vehicle_routes::create_vehicle_router())
        .nest("/bookings", routes::booking_routes::create_booking_router())
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    let config = state.config.clone();
    let router = Router::new()
        .nest("/api", api)
        .merge(routes::health_routes::create_health_router())
        .with_state(state);

    with_service_layers(router, &config)
}

/// Trace (capa externa), CORS y luego el timeout del request. Un timeout se
/// responde con el envelope de error estándar.
fn with_service_layers(router: Router, config: &EnvironmentConfig) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(&config.cors_origins))
            .layer(HandleErrorLayer::new(handle_middleware_error))
            .timeout(config.request_timeout),
    )
}
