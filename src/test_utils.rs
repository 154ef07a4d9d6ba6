//! Shared test utilities for `LaundryBuddy`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{
        catalog,
        transaction::{self, NewTransaction},
        user::{self, NewUser},
    },
    entities::{self, UserRole},
    errors::Result,
};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;

/// Reference rows most tests need
#[derive(Debug, Clone)]
pub struct CatalogFixture {
    /// A customer
    pub user: entities::user::Model,
    /// "Regular Clothes" at 20 per kilogram
    pub cloth: entities::cloth::Model,
    /// "Ariel" at a flat 15
    pub detergent: entities::detergent::Model,
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a customer named `name` with an email derived from it.
pub async fn create_test_user(db: &DatabaseConnection, name: &str) -> Result<entities::user::Model> {
    let email = format!("{}@laundry.test", name.to_lowercase().replace(' ', "."));
    user::create_user(
        db,
        NewUser {
            name: name.to_string(),
            email,
            password_hash: "test-hash".to_string(),
            role: UserRole::User,
        },
    )
    .await
}

/// Creates a cloth type with a custom price.
pub async fn create_test_cloth(
    db: &DatabaseConnection,
    name: &str,
    price_per_item: Decimal,
) -> Result<entities::cloth::Model> {
    catalog::add_cloth(db, name.to_string(), price_per_item).await
}

/// Creates a detergent with a custom price.
pub async fn create_test_detergent(
    db: &DatabaseConnection,
    name: &str,
    price: Decimal,
) -> Result<entities::detergent::Model> {
    catalog::add_detergent(db, name.to_string(), price).await
}

/// Creates an order for the fixture's customer, cloth type and detergent.
pub async fn create_test_transaction(
    db: &DatabaseConnection,
    fixture: &CatalogFixture,
    quantity: Decimal,
) -> Result<entities::transaction::Model> {
    transaction::create_transaction(
        db,
        NewTransaction {
            user_id: fixture.user.id,
            cloth_id: fixture.cloth.id,
            detergent_id: fixture.detergent.id,
            quantity,
        },
    )
    .await
}

/// Sets up a database with one customer, one cloth type (20/kg) and one detergent (15).
/// Returns (db, fixture) for common test scenarios.
pub async fn setup_with_catalog() -> Result<(DatabaseConnection, CatalogFixture)> {
    let db = setup_test_db().await?;
    let user = create_test_user(&db, "Test Customer").await?;
    let cloth = create_test_cloth(&db, "Regular Clothes", Decimal::from(20)).await?;
    let detergent = create_test_detergent(&db, "Ariel", Decimal::from(15)).await?;
    Ok((
        db,
        CatalogFixture {
            user,
            cloth,
            detergent,
        },
    ))
}
