//! User directory - customer and staff records.
//!
//! Transactions only hold a `user_id`; this module provides the records behind that id and the
//! name shown next to each order. Passwords are hashed by the authentication layer before they
//! reach this module.

use crate::{
    entities::{User, UserRole, user},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Serialize;
use tracing::info;

/// Data needed to register a user
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Display name
    pub name: String,
    /// Login email, must be unique
    pub email: String,
    /// Password hash from the authentication layer
    pub password_hash: String,
    /// Account role
    pub role: UserRole,
}

/// Id and display name, as offered in the order forms' customer picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    /// User id
    pub user_id: i64,
    /// Display name
    pub name: String,
}

/// Registers a new user.
///
/// # Errors
/// Returns a validation error if the name is empty, the email has no `@`, or the email is taken.
pub async fn create_user(db: &DatabaseConnection, new_user: NewUser) -> Result<user::Model> {
    let name = new_user.name.trim().to_string();
    let email = new_user.email.trim().to_lowercase();

    let mut violations = Vec::new();
    if name.is_empty() {
        violations.push("name cannot be empty".to_string());
    }
    if !email.contains('@') {
        violations.push(format!("email \"{email}\" is not a valid address"));
    }
    if !violations.is_empty() {
        return Err(Error::Validation { violations });
    }

    if get_user_by_email(db, &email).await?.is_some() {
        return Err(Error::invalid("Email already exists"));
    }

    let user = user::ActiveModel {
        name: Set(name),
        email: Set(email),
        password_hash: Set(new_user.password_hash),
        role: Set(new_user.role),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(user_id = user.id, role = ?user.role, "User registered");
    Ok(user)
}

/// Finds a user by email, ignoring case.
pub async fn get_user_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<user::Model>> {
    User::find()
        .filter(user::Column::Email.eq(email.trim().to_lowercase()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all users in registration order.
pub async fn list_users(db: &DatabaseConnection) -> Result<Vec<user::Model>> {
    User::find()
        .order_by_asc(user::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves id and name of every user.
pub async fn list_user_summaries(db: &DatabaseConnection) -> Result<Vec<UserSummary>> {
    Ok(list_users(db)
        .await?
        .into_iter()
        .map(|user| UserSummary {
            user_id: user.id,
            name: user.name,
        })
        .collect())
}
