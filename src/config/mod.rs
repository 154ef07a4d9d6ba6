/// Database configuration and connection management
pub mod database;

/// Seed catalog and user loading from config.toml
pub mod seed;

/// HTTP listener settings from environment variables
pub mod server;
