//! Catalog business logic - cloth types and detergents.
//!
//! The catalog is append-only: entries can be listed, looked up and added, never changed or
//! removed, since stored transactions keep pointing at them. [`ReferenceLookup`] is the id-keyed
//! view the transaction lifecycle uses to resolve prices and check that a customer exists.

use crate::{
    entities::{Cloth, Detergent, User, cloth, detergent},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Deserialize;
use tracing::info;

/// Read-only, id-keyed access to the reference data a transaction depends on.
///
/// Implemented for every `SeaORM` connection, so lookups can run inside the same database
/// transaction as the write that depends on them.
#[allow(async_fn_in_trait)]
pub trait ReferenceLookup {
    /// Price per kilogram of a cloth type, `None` if the id is unknown.
    async fn cloth_price(&self, cloth_id: i64) -> Result<Option<Decimal>>;

    /// Flat price of a detergent, `None` if the id is unknown.
    async fn detergent_price(&self, detergent_id: i64) -> Result<Option<Decimal>>;

    /// Whether a user with this id exists.
    async fn user_exists(&self, user_id: i64) -> Result<bool>;
}

impl<C> ReferenceLookup for C
where
    C: ConnectionTrait,
{
    async fn cloth_price(&self, cloth_id: i64) -> Result<Option<Decimal>> {
        Ok(Cloth::find_by_id(cloth_id)
            .one(self)
            .await?
            .map(|cloth| cloth.price_per_item))
    }

    async fn detergent_price(&self, detergent_id: i64) -> Result<Option<Decimal>> {
        Ok(Detergent::find_by_id(detergent_id)
            .one(self)
            .await?
            .map(|detergent| detergent.price))
    }

    async fn user_exists(&self, user_id: i64) -> Result<bool> {
        Ok(User::find_by_id(user_id).one(self).await?.is_some())
    }
}

/// Body of an add-cloth request. Accepts the `cloth_type` field name used by the shop's forms.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct AddClothRequest {
    /// Display label
    #[serde(alias = "cloth_type")]
    pub name: Option<String>,
    /// Price per kilogram
    pub price_per_item: Option<Decimal>,
}

/// Body of an add-detergent request. Accepts the `detergent_name` field name used by the shop's forms.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct AddDetergentRequest {
    /// Display name
    #[serde(alias = "detergent_name")]
    pub name: Option<String>,
    /// Flat price per order
    pub price: Option<Decimal>,
}

fn require_name_and_price(
    name: Option<String>,
    price: Option<Decimal>,
    name_field: &str,
    price_field: &str,
) -> Result<(String, Decimal)> {
    let mut violations = Vec::new();
    if name.is_none() {
        violations.push(format!("{name_field} is required"));
    }
    if price.is_none() {
        violations.push(format!("{price_field} is required"));
    }
    match (name, price) {
        (Some(name), Some(price)) => Ok((name, price)),
        _ => Err(Error::Validation { violations }),
    }
}

impl AddClothRequest {
    /// Checks that both fields are present.
    pub fn validate(self) -> Result<(String, Decimal)> {
        require_name_and_price(self.name, self.price_per_item, "cloth_type", "price_per_item")
    }
}

impl AddDetergentRequest {
    /// Checks that both fields are present.
    pub fn validate(self) -> Result<(String, Decimal)> {
        require_name_and_price(self.name, self.price, "detergent_name", "price")
    }
}

fn validate_entry(name: &str, price: Decimal) -> Result<String> {
    let mut violations = Vec::new();
    let name = name.trim();
    if name.is_empty() {
        violations.push("name cannot be empty".to_string());
    }
    if price < Decimal::ZERO {
        violations.push(format!("price cannot be negative (got {price})"));
    }
    if violations.is_empty() {
        Ok(name.to_string())
    } else {
        Err(Error::Validation { violations })
    }
}

/// Retrieves all cloth types, ordered alphabetically by name.
pub async fn list_clothes(db: &DatabaseConnection) -> Result<Vec<cloth::Model>> {
    Cloth::find()
        .order_by_asc(cloth::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a cloth type by its exact name.
pub async fn get_cloth_by_name(db: &DatabaseConnection, name: &str) -> Result<Option<cloth::Model>> {
    Cloth::find()
        .filter(cloth::Column::Name.eq(name.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Adds a cloth type to the catalog.
///
/// # Errors
/// Returns a validation error if:
/// - The name is empty or whitespace-only
/// - The price is negative
/// - A cloth type with the same name already exists
pub async fn add_cloth(
    db: &DatabaseConnection,
    name: String,
    price_per_item: Decimal,
) -> Result<cloth::Model> {
    let name = validate_entry(&name, price_per_item)?;

    if get_cloth_by_name(db, &name).await?.is_some() {
        return Err(Error::invalid(format!("Cloth type '{name}' already exists")));
    }

    let cloth = cloth::ActiveModel {
        name: Set(name),
        price_per_item: Set(price_per_item),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(cloth_id = cloth.id, name = %cloth.name, "Cloth type added");
    Ok(cloth)
}

/// Retrieves all detergents, ordered alphabetically by name.
pub async fn list_detergents(db: &DatabaseConnection) -> Result<Vec<detergent::Model>> {
    Detergent::find()
        .order_by_asc(detergent::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a detergent by its exact name.
pub async fn get_detergent_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<detergent::Model>> {
    Detergent::find()
        .filter(detergent::Column::Name.eq(name.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Adds a detergent to the catalog.
///
/// # Errors
/// Same rules as [`add_cloth`].
pub async fn add_detergent(
    db: &DatabaseConnection,
    name: String,
    price: Decimal,
) -> Result<detergent::Model> {
    let name = validate_entry(&name, price)?;

    if get_detergent_by_name(db, &name).await?.is_some() {
        return Err(Error::invalid(format!("Detergent '{name}' already exists")));
    }

    let detergent = detergent::ActiveModel {
        name: Set(name),
        price: Set(price),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(detergent_id = detergent.id, name = %detergent.name, "Detergent added");
    Ok(detergent)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_add_cloth_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = add_cloth(&db, "   ".to_string(), Decimal::from(20)).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let result = add_cloth(&db, "Towels".to_string(), Decimal::from(-1)).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_add_cloth_trims_and_lists_alphabetically() -> Result<()> {
        let db = setup_test_db().await?;

        let towels = add_cloth(&db, "  Towels ".to_string(), Decimal::from(25)).await?;
        add_cloth(&db, "Bedsheets".to_string(), Decimal::from(30)).await?;
        assert_eq!(towels.name, "Towels");

        let names: Vec<String> = list_clothes(&db).await?.into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Bedsheets".to_string(), "Towels".to_string()]);
        Ok(())
    }

    #[tokio::test]
    async fn test_add_cloth_rejects_duplicate_name() -> Result<()> {
        let db = setup_test_db().await?;
        add_cloth(&db, "Towels".to_string(), Decimal::from(25)).await?;

        let result = add_cloth(&db, "Towels".to_string(), Decimal::from(40)).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let kept = get_cloth_by_name(&db, "Towels").await?.unwrap();
        assert_eq!(kept.price_per_item, Decimal::from(25));
        Ok(())
    }

    #[tokio::test]
    async fn test_add_detergent_allows_free_detergent() -> Result<()> {
        let db = setup_test_db().await?;
        let none = add_detergent(&db, "Own detergent".to_string(), Decimal::ZERO).await?;
        assert_eq!(none.price, Decimal::ZERO);

        let found = get_detergent_by_name(&db, "Own detergent").await?;
        assert_eq!(found, Some(none));
        Ok(())
    }

    #[tokio::test]
    async fn test_reference_lookup_resolves_prices() -> Result<()> {
        let (db, fixture) = setup_with_catalog().await?;

        assert_eq!(db.cloth_price(fixture.cloth.id).await?, Some(Decimal::from(20)));
        assert_eq!(
            db.detergent_price(fixture.detergent.id).await?,
            Some(Decimal::from(15))
        );
        assert!(db.user_exists(fixture.user.id).await?);

        assert_eq!(db.cloth_price(999).await?, None);
        assert_eq!(db.detergent_price(999).await?, None);
        assert!(!db.user_exists(999).await?);
        Ok(())
    }

    #[test]
    fn test_add_requests_report_every_missing_field() {
        let err = AddClothRequest::default().validate().unwrap_err();
        match err {
            Error::Validation { violations } => assert_eq!(violations.len(), 2),
            other => panic!("unexpected error: {other}"),
        }

        let (name, price) = AddDetergentRequest {
            name: Some("Tide".to_string()),
            price: Some(Decimal::from(12)),
        }
        .validate()
        .unwrap();
        assert_eq!(name, "Tide");
        assert_eq!(price, Decimal::from(12));
    }
}
