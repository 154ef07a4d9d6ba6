//! Detergent entity - Catalog of detergents offered by the shop.
//!
//! A detergent is charged once per order regardless of weight.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Detergent database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "detergents")]
pub struct Model {
    /// Unique identifier for the detergent
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (e.g., "Ariel", "Tide")
    #[sea_orm(unique)]
    pub name: String,
    /// Flat price added to each order using this detergent
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub price: Decimal,
}

/// Defines relationships between Detergent and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One detergent is used by many transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
