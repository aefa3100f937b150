//! Configuration module for the congregation backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// MongoDB connection string
    pub mongodb_uri: String,
    /// Database holding the usuarios/miembros/notificaciones collections
    pub db_name: String,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mongodb_uri = env::var("MIEMBROS_MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://127.0.0.1:27017".to_string());

        let db_name = env::var("MIEMBROS_DB_NAME").unwrap_or_else(|_| "miembros".to_string());

        let bind_addr = env::var("MIEMBROS_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .expect("Invalid MIEMBROS_BIND_ADDR format");

        let log_level = env::var("MIEMBROS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Self {
            mongodb_uri,
            db_name,
            bind_addr,
            log_level,
        }
    }
}
