use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use vehicle_booking::{
    config::{DatabaseConfig, EnvironmentConfig, StorageBackend},
    create_app,
    database::DatabaseConnection,
    repositories::InMemoryStore,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .init();

    info!("🚗 Vehicle Service - disponibilidad, reservas y estado de vehículos");

    let config = EnvironmentConfig::from_env()?;
    info!(
        environment = %config.environment,
        storage = config.storage_backend.as_str(),
        boundary_policy = %config.boundary_policy,
        "Configuración cargada"
    );

    let state = match config.storage_backend {
        StorageBackend::Postgres => {
            let db_config = DatabaseConfig::from_env()?;
            let db = DatabaseConnection::connect(&db_config).await?;
            if config.run_migrations {
                db.run_migrations().await?;
            }
            db.check_tables().await;
            AppState::postgres(db.pool().clone(), config.clone())
        }
        StorageBackend::Memory => {
            warn!("⚠️ Usando almacenamiento en memoria, los datos se pierden al apagar");
            let store = InMemoryStore::new(config.boundary_policy);
            if config.is_development() {
                store.seed_demo_fleet().await;
            }
            AppState::in_memory(store, config.clone())
        }
    };

    let app = create_app(state);

    let addr: SocketAddr = config.server_url().parse()?;
    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("   GET    /api/vehicles/available?start_time&end_time");
    info!("   GET    /api/vehicles/:id");
    info!("   PUT    /api/vehicles/:id/status");
    info!("   GET    /api/vehicles/:id/history");
    info!("   POST   /api/bookings");
    info!("   GET    /api/bookings/my");
    info!("   PUT    /api/bookings/:id");
    info!("   DELETE /api/bookings/:id");
    info!("   PUT    /api/bookings/:id/confirm");
    info!("   PUT    /api/bookings/:id/complete");
    info!("   GET    /health");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Servidor detenido");
    Ok(())
}

/// Señal de apagado ordenado
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "No se pudo instalar el handler de Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "No se pudo instalar el handler de SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("🛑 Ctrl+C recibido, apagando"),
        _ = terminate => info!("🛑 Señal de terminación recibida, apagando"),
    }
}
