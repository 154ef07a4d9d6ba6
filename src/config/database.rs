//! Database configuration module for `LaundryBuddy`.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs without hand-written SQL.

use crate::entities::{Cloth, Detergent, Transaction, User};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use std::path::Path;
use tracing::{debug, info, instrument};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/laundry.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable or returns the default
/// local `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by [`get_database_url`].
///
/// For file-backed `SQLite` URLs the parent directory is created first.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    if let Some(dir) = sqlite_parent_dir(&database_url) {
        std::fs::create_dir_all(dir)?;
    }
    debug!("Connecting to database at {}", database_url);
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Directory holding the database file of a `sqlite:` URL, if there is one to create.
fn sqlite_parent_dir(url: &str) -> Option<&Path> {
    let rest = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    let file = rest.split('?').next().unwrap_or(rest);
    if file.is_empty() || file == ":memory:" {
        return None;
    }
    Path::new(file)
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
}

/// Creates all tables that do not exist yet.
///
/// Parent tables (users, clothes, detergents) are created before `transactions`
/// so its foreign keys resolve.
#[instrument(skip(db))]
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let tables = [
        schema.create_table_from_entity(User).if_not_exists().to_owned(),
        schema.create_table_from_entity(Cloth).if_not_exists().to_owned(),
        schema.create_table_from_entity(Detergent).if_not_exists().to_owned(),
        schema.create_table_from_entity(Transaction).if_not_exists().to_owned(),
    ];

    for table in &tables {
        db.execute(builder.build(table)).await?;
    }

    info!("Database tables ensured.");
    Ok(())
}
