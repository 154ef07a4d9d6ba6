//! `GET` and `POST` handlers on `/transactions`.

use super::{
    AppState,
    error::{ApiError, body_value, decode, parse_id},
};
use crate::{
    core::{
        catalog,
        listing::{self, BillingMonth},
        payment::{self, PaymentRequest},
        transaction::{self, CreateTransactionRequest},
        user,
    },
    errors::{Error, Result},
};
use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::{Value, json};

/// Query string accepted on `GET /transactions`
#[derive(Debug, Default, Deserialize)]
pub struct FetchQuery {
    action: Option<String>,
    month: Option<String>,
    user_id: Option<String>,
    transaction_id: Option<String>,
}

/// Query string accepted on `POST /transactions`
#[derive(Debug, Default, Deserialize)]
pub struct ActionQuery {
    action: Option<String>,
}

/// Delete body; the shop's forms send `id`, other callers `transaction_id`.
#[derive(Debug, Default, Deserialize)]
struct DeleteRequest {
    id: Option<i64>,
    transaction_id: Option<i64>,
}

/// Read dispatch on the `action` query parameter.
pub async fn fetch(
    State(state): State<AppState>,
    Query(query): Query<FetchQuery>,
) -> std::result::Result<Response, ApiError> {
    let db: &DatabaseConnection = &state.db;

    let response = match query.action.as_deref() {
        Some("fetch_pending_transactions") => {
            Json(listing::fetch_pending_transactions(db).await?).into_response()
        }
        Some("fetchCompletedTransactions") => {
            let month: BillingMonth = query
                .month
                .as_deref()
                .ok_or_else(|| Error::invalid("Month parameter is required"))?
                .parse()?;
            let transactions = listing::fetch_completed_transactions(db, month).await?;
            Json(json!({ "transactions": transactions })).into_response()
        }
        Some("fetch_by_user") => {
            let user_id = parse_id(query.user_id.as_deref(), "user_id")?;
            let transactions = listing::fetch_transactions_by_user(db, user_id).await?;
            Json(json!({ "success": true, "transactions": transactions })).into_response()
        }
        Some("fetch_transaction") => {
            let transaction_id = parse_id(query.transaction_id.as_deref(), "transaction_id")?;
            let transaction = listing::fetch_transaction(db, transaction_id)
                .await?
                .ok_or(Error::NotFound {
                    entity: "Transaction",
                    id: transaction_id,
                })?;
            Json(json!({ "success": true, "transaction": transaction })).into_response()
        }
        Some("fetch_users") => Json(user::list_user_summaries(db).await?).into_response(),
        Some("fetch_cloths") => Json(catalog::list_clothes(db).await?).into_response(),
        Some("fetch_detergents") => Json(catalog::list_detergents(db).await?).into_response(),
        _ => Json(listing::fetch_all_transactions(db).await?).into_response(),
    };

    Ok(response)
}

/// Write dispatch on the `action` field of the body, falling back to the query string.
pub async fn submit(
    State(state): State<AppState>,
    Query(query): Query<ActionQuery>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Response {
    let value = match body_value(body) {
        Ok(value) => value,
        Err(e) => return ApiError(e).into_response(),
    };
    let action = value
        .get("action")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .or(query.action);

    match action.as_deref() {
        Some("update_payment_status") => match pay(&state, value).await {
            Ok(body) => body.into_response(),
            Err(e) => ApiError(e).into_payment_response(),
        },
        Some("delete_transaction") => into_response(delete(&state, value).await),
        _ => into_response(create(&state, value).await),
    }
}

fn into_response(result: Result<Json<Value>>) -> Response {
    match result {
        Ok(body) => body.into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

async fn create(state: &AppState, value: Value) -> Result<Json<Value>> {
    let new = decode::<CreateTransactionRequest>(value)?.validate()?;
    let created = transaction::create_transaction(&state.db, new).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Transaction added successfully.",
        "transaction_id": created.id,
    })))
}

async fn delete(state: &AppState, value: Value) -> Result<Json<Value>> {
    let request = decode::<DeleteRequest>(value)?;
    let id = request
        .id
        .or(request.transaction_id)
        .ok_or_else(|| Error::invalid("id is required"))?;
    let deleted = transaction::delete_transaction(&state.db, id).await?;
    Ok(Json(json!({
        "message": "Transaction deleted successfully.",
        "deleted": deleted,
    })))
}

async fn pay(state: &AppState, value: Value) -> Result<Json<Value>> {
    let payment = decode::<PaymentRequest>(value)?.validate()?;
    let receipt = payment::process_payment(&state.db, payment).await?;
    Ok(Json(json!({
        "success": true,
        "transaction_id": receipt.transaction.id,
        "change": receipt.change,
        "payment_date": receipt.transaction.payment_date,
    })))
}
