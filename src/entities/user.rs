//! User entity - Customers and shop administrators.
//!
//! Transactions reference users by id only; the name is joined in for display.
//! The password hash is produced by the authentication layer and never leaves the service.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account role
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Regular customer
    #[sea_orm(string_value = "user")]
    User,
    /// Shop staff with access to dashboards and payments
    #[sea_orm(string_value = "admin")]
    Admin,
}

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name
    pub name: String,
    /// Login email, unique across users
    #[sea_orm(unique)]
    pub email: String,
    /// Password hash as produced by the authentication layer
    #[serde(default, skip_serializing)]
    pub password_hash: String,
    /// Account role
    pub role: UserRole,
    /// When the user registered
    pub created_at: DateTimeUtc,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One user places many transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
