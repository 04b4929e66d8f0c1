//! Módulo de base de datos
//!
//! Conexión a PostgreSQL y gestión del esquema.

pub mod connection;

pub use connection::DatabaseConnection;
