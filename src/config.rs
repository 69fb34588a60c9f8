//! Application configuration.
//!
//! Scheduling policy constants live next to the code that uses them in
//! `srs`; this module covers storage, server and study-session settings.

use serde::Deserialize;
use std::path::PathBuf;

use crate::paths;

// ==================== Database Configuration ====================

/// Configuration file structure for config.toml
#[derive(Debug, Default, Deserialize)]
struct AppConfig {
    database: Option<DatabaseConfig>,
    server: Option<ServerConfig>,
}

#[derive(Debug, Deserialize)]
struct DatabaseConfig {
    path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ServerConfig {
    port: Option<u16>,
}

fn read_config_file() -> AppConfig {
    let Ok(contents) = std::fs::read_to_string(CONFIG_FILE) else {
        return AppConfig::default();
    };
    parse_config(&contents)
}

fn parse_config(contents: &str) -> AppConfig {
    match toml::from_str::<AppConfig>(contents) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Ignoring invalid {}: {}", CONFIG_FILE, e);
            AppConfig::default()
        }
    }
}

/// Optional configuration file read from the working directory
pub const CONFIG_FILE: &str = "config.toml";

/// Load database path with priority: config.toml > .env / DATABASE_PATH > default
pub fn load_database_path() -> PathBuf {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Priority 1: config.toml
    if let Some(path) = read_config_file().database.and_then(|db| db.path) {
        tracing::info!("Using database from {}: {}", CONFIG_FILE, path);
        return PathBuf::from(path);
    }

    // Priority 2: .env DATABASE_PATH
    if let Ok(path) = std::env::var("DATABASE_PATH") {
        tracing::info!("Using database from DATABASE_PATH env: {}", path);
        return PathBuf::from(path);
    }

    // Default
    let default = PathBuf::from(paths::db_path());
    tracing::info!("Using default database path: {}", default.display());
    default
}

// ==================== Server Configuration ====================

/// Server address to bind to
pub const SERVER_ADDR: &str = "0.0.0.0";

/// Default server port
pub const SERVER_PORT: u16 = 3000;

/// Server port with priority: config.toml > PORT env > default
pub fn server_port() -> u16 {
    if let Some(port) = read_config_file().server.and_then(|s| s.port) {
        return port;
    }
    std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(SERVER_PORT)
}

/// Get the full server bind address
pub fn server_bind_addr() -> String {
    format!("{}:{}", SERVER_ADDR, server_port())
}

// ==================== Study Configuration ====================

/// Number of days covered by the review activity histogram
pub const ACTIVITY_WINDOW_DAYS: u32 = 7;

/// Seed sample decks into an empty store on startup
pub const SEED_SAMPLE_DECKS: bool = true;
