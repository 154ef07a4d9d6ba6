//! Catalog handlers on `/clothes` and `/detergents`.

use super::{
    AppState,
    error::{ApiError, body_value, decode},
};
use crate::{
    core::catalog::{self, AddClothRequest, AddDetergentRequest},
    entities::{cloth, detergent},
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde_json::{Value, json};

type Handled<T> = Result<Json<T>, ApiError>;

/// Lists every cloth type.
pub async fn list_clothes(State(state): State<AppState>) -> Handled<Vec<cloth::Model>> {
    Ok(Json(catalog::list_clothes(&state.db).await?))
}

/// Adds a cloth type from `{cloth_type, price_per_item}`.
pub async fn add_cloth(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Handled<Value> {
    let (name, price) = decode::<AddClothRequest>(body_value(body)?)?.validate()?;
    let cloth = catalog::add_cloth(&state.db, name, price).await?;
    Ok(Json(json!({
        "message": "Cloth added successfully.",
        "cloth_id": cloth.id,
    })))
}

/// Lists every detergent.
pub async fn list_detergents(State(state): State<AppState>) -> Handled<Vec<detergent::Model>> {
    Ok(Json(catalog::list_detergents(&state.db).await?))
}

/// Adds a detergent from `{detergent_name, price}`.
pub async fn add_detergent(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Handled<Value> {
    let (name, price) = decode::<AddDetergentRequest>(body_value(body)?)?.validate()?;
    let detergent = catalog::add_detergent(&state.db, name, price).await?;
    Ok(Json(json!({
        "message": "Detergent added successfully.",
        "detergent_id": detergent.id,
    })))
}
