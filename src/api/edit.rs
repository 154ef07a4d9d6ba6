//! `PUT` handler on `/transactions`: single-order edit or bulk status change.

use super::{
    AppState,
    error::{ApiError, body_value, decode},
};
use crate::core::transaction::{self, BulkStatusRequest, EditTransactionRequest};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

/// Bodies carrying `transaction_ids` are bulk status changes; anything else is an edit.
pub async fn update(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let value = body_value(body)?;

    if value.get("transaction_ids").is_some() {
        let update = decode::<BulkStatusRequest>(value)?.validate()?;
        let updated = transaction::bulk_update_status(&state.db, update).await?;
        return Ok(Json(json!({
            "message": format!("Successfully updated {updated} transaction(s)"),
        }))
        .into_response());
    }

    let edit = decode::<EditTransactionRequest>(value)?.validate()?;
    let updated = transaction::edit_transaction(&state.db, edit).await?;
    if updated == 0 {
        return Ok((
            StatusCode::CONFLICT,
            Json(json!({ "error": "No transaction updated. Please check the data." })),
        )
            .into_response());
    }

    Ok(Json(json!({ "message": "Transaction updated successfully." })).into_response())
}
