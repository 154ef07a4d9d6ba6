//! Transaction entity - One laundry order.
//!
//! Each transaction links a `user_id`, `cloth_id` and `detergent_id` with a `quantity` in kilograms
//! and a stored `total_price`. Two independent status axes track it: `status` follows the
//! laundry itself, `payment_status` follows the bill. `payment_date` is set exactly when the
//! payment is completed.

use std::{fmt, str::FromStr};

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::Error;

/// Order fulfillment stage
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum OrderStatus {
    /// Dropped off, not yet washed
    #[sea_orm(string_value = "Pending")]
    #[serde(rename = "Pending")]
    Pending,
    /// Washed and waiting for the customer
    #[sea_orm(string_value = "Ready to Pick-Up")]
    #[serde(rename = "Ready to Pick-Up")]
    ReadyToPickUp,
    /// Collected by the customer
    #[sea_orm(string_value = "Picked-Up")]
    #[serde(rename = "Picked-Up")]
    PickedUp,
}

impl OrderStatus {
    /// Wire and storage label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::ReadyToPickUp => "Ready to Pick-Up",
            Self::PickedUp => "Picked-Up",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Ready to Pick-Up" => Ok(Self::ReadyToPickUp),
            "Picked-Up" => Ok(Self::PickedUp),
            other => Err(Error::invalid(format!(
                "status must be one of \"Pending\", \"Ready to Pick-Up\", \"Picked-Up\" (got \"{other}\")"
            ))),
        }
    }
}

/// Billing stage, independent of [`OrderStatus`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Not paid yet
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Paid in full; terminal
    #[sea_orm(string_value = "completed")]
    Completed,
}

impl PaymentStatus {
    /// Wire and storage label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transaction database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Customer who placed the order
    pub user_id: i64,
    /// Cloth type being washed
    pub cloth_id: i64,
    /// Detergent used for the order
    pub detergent_id: i64,
    /// Weight in kilograms
    #[sea_orm(column_type = "Decimal(Some((10, 3)))")]
    pub quantity: Decimal,
    /// Price computed from the catalog when the order was last written
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub total_price: Decimal,
    /// Fulfillment stage
    pub status: OrderStatus,
    /// Billing stage
    pub payment_status: PaymentStatus,
    /// When the payment was completed; `None` while unpaid
    pub payment_date: Option<DateTimeUtc>,
    /// When the order was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Transaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each transaction belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    /// Each transaction uses one cloth type
    #[sea_orm(
        belongs_to = "super::cloth::Entity",
        from = "Column::ClothId",
        to = "super::cloth::Column::Id"
    )]
    Cloth,
    /// Each transaction uses one detergent
    #[sea_orm(
        belongs_to = "super::detergent::Entity",
        from = "Column::DetergentId",
        to = "super::detergent::Column::Id"
    )]
    Detergent,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::cloth::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cloth.def()
    }
}

impl Related<super::detergent::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Detergent.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
