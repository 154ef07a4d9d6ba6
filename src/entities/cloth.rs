//! Cloth entity - Catalog of laundry item categories.
//!
//! Each cloth type has a display name and a price charged per kilogram of laundry.
//! Rows are only ever added; transactions keep referring to them by id.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Cloth type database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "clothes")]
pub struct Model {
    /// Unique identifier for the cloth type
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display label (e.g., "Bedsheets", "Regular Clothes")
    #[sea_orm(unique)]
    pub name: String,
    /// Price charged per kilogram
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub price_per_item: Decimal,
}

/// Defines relationships between Cloth and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One cloth type is used by many transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
