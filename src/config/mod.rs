//! Configuración
//!
//! Entorno y base de datos.

pub mod database;
pub mod environment;

pub use database::DatabaseConfig;
pub use environment::{ConfigError, EnvironmentConfig, StorageBackend};
