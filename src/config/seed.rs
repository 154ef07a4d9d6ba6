//! Seed data loading from config.toml
//!
//! The shop's starting catalog (cloth types and detergents) and initial accounts are listed in a
//! TOML file. Seeding runs at startup and only inserts entries that are not in the database yet,
//! so restarting the service never duplicates rows or overwrites prices already in use.

use crate::{
    core::{catalog, user},
    entities::UserRole,
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct SeedConfig {
    /// Cloth types to make available
    #[serde(default)]
    pub clothes: Vec<ClothSeed>,
    /// Detergents to make available
    #[serde(default)]
    pub detergents: Vec<DetergentSeed>,
    /// Accounts to register
    #[serde(default)]
    pub users: Vec<UserSeed>,
}

/// A single cloth type entry
#[derive(Debug, Deserialize, Clone)]
pub struct ClothSeed {
    /// Display label
    pub name: String,
    /// Price per kilogram
    pub price_per_item: Decimal,
}

/// A single detergent entry
#[derive(Debug, Deserialize, Clone)]
pub struct DetergentSeed {
    /// Display name
    pub name: String,
    /// Flat price per order
    pub price: Decimal,
}

/// A single account entry
#[derive(Debug, Deserialize, Clone)]
pub struct UserSeed {
    /// Display name
    pub name: String,
    /// Login email
    pub email: String,
    /// Pre-computed password hash
    #[serde(default)]
    pub password_hash: String,
    /// Account role, `user` when omitted
    #[serde(default = "default_role")]
    pub role: UserRole,
}

const fn default_role() -> UserRole {
    UserRole::User
}

/// Counts of rows inserted by [`seed_database`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    /// Cloth types inserted
    pub clothes: usize,
    /// Detergents inserted
    pub detergents: usize,
    /// Users inserted
    pub users: usize,
}

/// Loads seed configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SeedConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads seed configuration, treating a missing file as an empty configuration.
///
/// A file that exists but cannot be parsed is still an error.
pub fn load_config_or_default<P: AsRef<Path>>(path: P) -> Result<SeedConfig> {
    let path = path.as_ref();
    if !path.exists() {
        warn!("Seed file {:?} not found, starting without seed data", path);
        return Ok(SeedConfig::default());
    }
    load_config(path)
}

/// Inserts every configured cloth type, detergent and user that does not exist yet.
///
/// Cloth types and detergents are matched by name, users by email.
#[instrument(skip(db, config))]
pub async fn seed_database(db: &DatabaseConnection, config: &SeedConfig) -> Result<SeedSummary> {
    let mut summary = SeedSummary::default();

    for cloth in &config.clothes {
        if catalog::get_cloth_by_name(db, &cloth.name).await?.is_some() {
            debug!("Cloth type '{}' already present", cloth.name);
            continue;
        }
        catalog::add_cloth(db, cloth.name.clone(), cloth.price_per_item).await?;
        summary.clothes += 1;
    }

    for detergent in &config.detergents {
        if catalog::get_detergent_by_name(db, &detergent.name).await?.is_some() {
            debug!("Detergent '{}' already present", detergent.name);
            continue;
        }
        catalog::add_detergent(db, detergent.name.clone(), detergent.price).await?;
        summary.detergents += 1;
    }

    for account in &config.users {
        if user::get_user_by_email(db, &account.email).await?.is_some() {
            debug!("User '{}' already present", account.email);
            continue;
        }
        user::create_user(
            db,
            user::NewUser {
                name: account.name.clone(),
                email: account.email.clone(),
                password_hash: account.password_hash.clone(),
                role: account.role,
            },
        )
        .await?;
        summary.users += 1;
    }

    info!(
        clothes = summary.clothes,
        detergents = summary.detergents,
        users = summary.users,
        "Seed data applied"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::setup_test_db;

    const SAMPLE: &str = r#"
        [[clothes]]
        name = "Regular Clothes"
        price_per_item = 20

        [[clothes]]
        name = "Bedsheets"
        price_per_item = 35.5

        [[detergents]]
        name = "Ariel"
        price = 15

        [[users]]
        name = "Front Desk"
        email = "desk@laundry.test"
        role = "admin"

        [[users]]
        name = "Juan"
        email = "juan@laundry.test"
    "#;

    #[test]
    fn test_parse_seed_config() {
        let config: SeedConfig = toml::from_str(SAMPLE).unwrap();
        assert_eq!(config.clothes.len(), 2);
        assert_eq!(config.clothes[1].price_per_item, Decimal::new(355, 1));
        assert_eq!(config.detergents[0].price, Decimal::from(15));
        assert_eq!(config.users[0].role, UserRole::Admin);
        assert_eq!(config.users[1].role, UserRole::User);
        assert_eq!(config.users[1].password_hash, "");
    }

    #[test]
    fn test_missing_file_yields_empty_config() -> Result<()> {
        let config = load_config_or_default("definitely/not/here.toml")?;
        assert!(config.clothes.is_empty());
        assert!(config.detergents.is_empty());
        assert!(config.users.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_seed_database_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;
        let config: SeedConfig = toml::from_str(SAMPLE).unwrap();

        let first = seed_database(&db, &config).await?;
        assert_eq!(
            first,
            SeedSummary {
                clothes: 2,
                detergents: 1,
                users: 2
            }
        );

        let second = seed_database(&db, &config).await?;
        assert_eq!(second, SeedSummary::default());

        assert_eq!(catalog::list_clothes(&db).await?.len(), 2);
        assert_eq!(catalog::list_detergents(&db).await?.len(), 1);
        assert_eq!(user::list_users(&db).await?.len(), 2);
        Ok(())
    }
}
