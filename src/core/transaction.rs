//! Transaction lifecycle - creating, editing, bulk status updates and deleting laundry orders.
//!
//! Request bodies arrive as loosely filled structs (`Option` fields) and are validated as a whole
//! before any database access, so a caller learns about every missing or malformed field at once.
//! Writes that depend on reference data resolve it through [`ReferenceLookup`] inside the same
//! database transaction, and the stored `total_price` is always recomputed from the current
//! catalog: a price sent by the client is never trusted.
//!
//! None of these operations touch `payment_status`; only [`crate::core::payment`] moves a
//! transaction to `completed`.

use std::collections::BTreeSet;

use crate::{
    core::{catalog::ReferenceLookup, pricing},
    entities::{OrderStatus, PaymentStatus, Transaction, transaction},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{Set, TransactionTrait, prelude::*};
use serde::Deserialize;
use tracing::{info, instrument, warn};

/// Body of a create request
#[derive(Debug, Default, Clone, Deserialize)]
pub struct CreateTransactionRequest {
    /// Customer placing the order
    pub user_id: Option<i64>,
    /// Cloth type
    pub cloth_id: Option<i64>,
    /// Detergent
    pub detergent_id: Option<i64>,
    /// Weight in kilograms
    pub quantity: Option<Decimal>,
}

/// A validated create request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewTransaction {
    /// Customer placing the order
    pub user_id: i64,
    /// Cloth type
    pub cloth_id: i64,
    /// Detergent
    pub detergent_id: i64,
    /// Weight in kilograms, always positive
    pub quantity: Decimal,
}

/// Body of an edit request
///
/// Any `total_price` the client sends along is ignored.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct EditTransactionRequest {
    /// Transaction to edit
    pub transaction_id: Option<i64>,
    /// Customer placing the order
    pub user_id: Option<i64>,
    /// Cloth type
    pub cloth_id: Option<i64>,
    /// Detergent
    pub detergent_id: Option<i64>,
    /// Weight in kilograms
    pub quantity: Option<Decimal>,
    /// New fulfillment stage label
    pub status: Option<String>,
}

/// A validated edit request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionEdit {
    /// Transaction to edit
    pub transaction_id: i64,
    /// Customer placing the order
    pub user_id: i64,
    /// Cloth type
    pub cloth_id: i64,
    /// Detergent
    pub detergent_id: i64,
    /// Weight in kilograms, always positive
    pub quantity: Decimal,
    /// New fulfillment stage
    pub status: OrderStatus,
}

/// Body of a bulk status request
#[derive(Debug, Default, Clone, Deserialize)]
pub struct BulkStatusRequest {
    /// Transactions to update
    pub transaction_ids: Option<Vec<i64>>,
    /// New fulfillment stage label
    pub status: Option<String>,
}

/// A validated bulk status request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkStatusUpdate {
    /// Distinct ids to update, never empty
    pub transaction_ids: BTreeSet<i64>,
    /// New fulfillment stage
    pub status: OrderStatus,
}

/// Collects violations for one request.
#[derive(Debug, Default)]
struct Violations(Vec<String>);

impl Violations {
    fn require<T>(&mut self, value: Option<T>, field: &str) -> Option<T> {
        if value.is_none() {
            self.0.push(format!("{field} is required"));
        }
        value
    }

    fn quantity(&mut self, quantity: Option<Decimal>) -> Option<Decimal> {
        match self.require(quantity, "quantity") {
            Some(q) if q <= Decimal::ZERO => {
                self.0.push(format!("quantity must be greater than zero (got {q})"));
                None
            }
            other => other,
        }
    }

    fn status(&mut self, status: Option<String>) -> Option<OrderStatus> {
        let label = self.require(status, "status")?;
        match label.parse() {
            Ok(OrderStatus::PickedUp) => {
                self.0.push(
                    "status cannot be set to \"Picked-Up\" directly, record a payment instead"
                        .to_string(),
                );
                None
            }
            Ok(status) => Some(status),
            Err(Error::Validation { violations }) => {
                self.0.extend(violations);
                None
            }
            Err(other) => {
                self.0.push(other.to_string());
                None
            }
        }
    }

    fn finish<T>(self, value: Option<T>) -> Result<T> {
        match value {
            Some(value) if self.0.is_empty() => Ok(value),
            _ => Err(Error::Validation { violations: self.0 }),
        }
    }
}

impl CreateTransactionRequest {
    /// Checks that every field is present and the quantity is positive.
    pub fn validate(self) -> Result<NewTransaction> {
        let mut v = Violations::default();
        let user_id = v.require(self.user_id, "user_id");
        let cloth_id = v.require(self.cloth_id, "cloth_id");
        let detergent_id = v.require(self.detergent_id, "detergent_id");
        let quantity = v.quantity(self.quantity);

        let validated = match (user_id, cloth_id, detergent_id, quantity) {
            (Some(user_id), Some(cloth_id), Some(detergent_id), Some(quantity)) => {
                Some(NewTransaction {
                    user_id,
                    cloth_id,
                    detergent_id,
                    quantity,
                })
            }
            _ => None,
        };
        v.finish(validated)
    }
}

impl EditTransactionRequest {
    /// Checks that every field is present, the quantity is positive and the status is known.
    pub fn validate(self) -> Result<TransactionEdit> {
        let mut v = Violations::default();
        let transaction_id = v.require(self.transaction_id, "transaction_id");
        let user_id = v.require(self.user_id, "user_id");
        let cloth_id = v.require(self.cloth_id, "cloth_id");
        let detergent_id = v.require(self.detergent_id, "detergent_id");
        let quantity = v.quantity(self.quantity);
        let status = v.status(self.status);

        let validated = match (transaction_id, user_id, cloth_id, detergent_id, quantity, status) {
            (
                Some(transaction_id),
                Some(user_id),
                Some(cloth_id),
                Some(detergent_id),
                Some(quantity),
                Some(status),
            ) => Some(TransactionEdit {
                transaction_id,
                user_id,
                cloth_id,
                detergent_id,
                quantity,
                status,
            }),
            _ => None,
        };
        v.finish(validated)
    }
}

impl BulkStatusRequest {
    /// Checks that at least one id is given and the status is known. Duplicate ids collapse.
    pub fn validate(self) -> Result<BulkStatusUpdate> {
        let mut v = Violations::default();
        let ids: Option<BTreeSet<i64>> = v
            .require(self.transaction_ids, "transaction_ids")
            .map(|ids| ids.into_iter().collect());
        let ids = match ids {
            Some(ids) if ids.is_empty() => {
                v.0.push("transaction_ids cannot be empty".to_string());
                None
            }
            other => other,
        };
        let status = v.status(self.status);

        let validated = match (ids, status) {
            (Some(transaction_ids), Some(status)) => Some(BulkStatusUpdate {
                transaction_ids,
                status,
            }),
            _ => None,
        };
        v.finish(validated)
    }
}

/// Resolves current catalog prices and computes the order total.
///
/// # Errors
/// `NotFound` if the cloth type or detergent does not exist, `Validation` if the total overflows.
pub async fn resolve_total<L>(
    lookup: &L,
    cloth_id: i64,
    detergent_id: i64,
    quantity: Decimal,
) -> Result<Decimal>
where
    L: ReferenceLookup,
{
    let cloth_price = lookup
        .cloth_price(cloth_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "Cloth",
            id: cloth_id,
        })?;
    let detergent_price = lookup
        .detergent_price(detergent_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "Detergent",
            id: detergent_id,
        })?;

    pricing::compute_total(cloth_price, detergent_price, quantity)
        .ok_or_else(|| Error::invalid(format!("quantity {quantity} is too large to price")))
}

async fn ensure_user_exists<L>(lookup: &L, user_id: i64) -> Result<()>
where
    L: ReferenceLookup,
{
    if lookup.user_exists(user_id).await? {
        Ok(())
    } else {
        Err(Error::NotFound {
            entity: "User",
            id: user_id,
        })
    }
}

/// Creates a new order in state (`Pending`, `pending`).
///
/// The user, cloth type and detergent must all exist; nothing is written otherwise.
#[instrument(skip(db))]
pub async fn create_transaction(
    db: &DatabaseConnection,
    new: NewTransaction,
) -> Result<transaction::Model> {
    let txn = db.begin().await?;

    ensure_user_exists(&txn, new.user_id).await?;
    let total_price = resolve_total(&txn, new.cloth_id, new.detergent_id, new.quantity).await?;

    let created = transaction::ActiveModel {
        user_id: Set(new.user_id),
        cloth_id: Set(new.cloth_id),
        detergent_id: Set(new.detergent_id),
        quantity: Set(new.quantity),
        total_price: Set(total_price),
        status: Set(OrderStatus::Pending),
        payment_status: Set(PaymentStatus::Pending),
        payment_date: Set(None),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    info!(transaction_id = created.id, total_price = %created.total_price, "Transaction created");
    Ok(created)
}

/// Rewrites every mutable field of an unpaid order and recomputes its price.
///
/// The price is recomputed even when cloth, detergent and quantity are unchanged, so the stored
/// total always reflects the catalog at the time of the edit. `payment_status` and
/// `payment_date` are left as they are.
///
/// # Errors
/// - `NotFound` if the order, user, cloth type or detergent does not exist
/// - `Validation` if the order has already been paid
///
/// # Returns
/// Number of rows the update affected. `0` means the row was paid or removed between the lookup
/// and the update; callers should report it as a soft failure rather than an error.
#[instrument(skip(db))]
pub async fn edit_transaction(db: &DatabaseConnection, edit: TransactionEdit) -> Result<u64> {
    let txn = db.begin().await?;

    let order = Transaction::find_by_id(edit.transaction_id)
        .one(&txn)
        .await?
        .ok_or(Error::NotFound {
            entity: "Transaction",
            id: edit.transaction_id,
        })?;
    if order.payment_status == PaymentStatus::Completed {
        return Err(Error::invalid(format!(
            "Transaction {} has already been paid and can no longer be edited",
            order.id
        )));
    }

    ensure_user_exists(&txn, edit.user_id).await?;
    let total_price =
        resolve_total(&txn, edit.cloth_id, edit.detergent_id, edit.quantity).await?;

    let result = Transaction::update_many()
        .set(transaction::ActiveModel {
            user_id: Set(edit.user_id),
            cloth_id: Set(edit.cloth_id),
            detergent_id: Set(edit.detergent_id),
            quantity: Set(edit.quantity),
            total_price: Set(total_price),
            status: Set(edit.status),
            ..Default::default()
        })
        .filter(transaction::Column::Id.eq(edit.transaction_id))
        .filter(transaction::Column::PaymentStatus.eq(PaymentStatus::Pending))
        .exec(&txn)
        .await?;

    txn.commit().await?;

    if result.rows_affected == 0 {
        warn!(transaction_id = edit.transaction_id, "Edit matched no rows");
    } else {
        info!(
            transaction_id = edit.transaction_id,
            status = %edit.status,
            total_price = %total_price,
            "Transaction edited"
        );
    }
    Ok(result.rows_affected)
}

/// Sets the fulfillment stage of every listed unpaid order in one statement.
///
/// Ids that do not exist or belong to paid orders are skipped without error; only the number of
/// updated rows is reported.
#[instrument(skip(db), fields(count = update.transaction_ids.len()))]
pub async fn bulk_update_status(db: &DatabaseConnection, update: BulkStatusUpdate) -> Result<u64> {
    let result = Transaction::update_many()
        .set(transaction::ActiveModel {
            status: Set(update.status),
            ..Default::default()
        })
        .filter(transaction::Column::Id.is_in(update.transaction_ids.iter().copied()))
        .filter(transaction::Column::PaymentStatus.eq(PaymentStatus::Pending))
        .exec(db)
        .await?;

    info!(
        status = %update.status,
        updated = result.rows_affected,
        "Bulk status update applied"
    );
    Ok(result.rows_affected)
}

/// Permanently removes an order.
///
/// Deleting an id that does not exist is not an error.
///
/// # Returns
/// Number of rows removed (`0` or `1`).
#[instrument(skip(db))]
pub async fn delete_transaction(db: &DatabaseConnection, transaction_id: i64) -> Result<u64> {
    let result = Transaction::delete_by_id(transaction_id).exec(db).await?;
    if result.rows_affected == 0 {
        warn!(transaction_id, "Delete requested for a transaction that does not exist");
    } else {
        info!(transaction_id, "Transaction deleted");
    }
    Ok(result.rows_affected)
}

/// Retrieves a specific transaction by its unique ID.
pub async fn get_transaction_by_id(
    db: &DatabaseConnection,
    transaction_id: i64,
) -> Result<Option<transaction::Model>> {
    Transaction::find_by_id(transaction_id)
        .one(db)
        .await
        .map_err(Into::into)
}
