//! Payment processing - settling an order with cash.
//!
//! This is the only place that sets `payment_status = completed` or `status = Picked-Up`. Both are
//! written together with a server-side `payment_date`, in one update, and only while the payment
//! is still pending. Edits and bulk status changes skip paid orders, so a completed payment can
//! never be completed again or reverted.

use crate::{
    core::pricing,
    entities::{OrderStatus, PaymentStatus, Transaction, transaction},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{Set, TransactionTrait, prelude::*};
use serde::Deserialize;
use tracing::{info, instrument, warn};

/// Body of a payment request.
///
/// `payment_status` and `status` are optional echoes of the target state; when sent they must
/// name the only transition this operation performs.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PaymentRequest {
    /// Transaction being paid
    pub transaction_id: Option<i64>,
    /// Cash handed over by the customer
    pub cash_tendered: Option<Decimal>,
    /// Must be `"completed"` if present
    pub payment_status: Option<String>,
    /// Must be `"Picked-Up"` if present
    pub status: Option<String>,
}

/// A validated payment request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Payment {
    /// Transaction being paid
    pub transaction_id: i64,
    /// Cash handed over by the customer
    pub cash_tendered: Decimal,
}

/// Outcome of a successful payment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentReceipt {
    /// The transaction after the update
    pub transaction: transaction::Model,
    /// Change to hand back to the customer; never stored
    pub change: Decimal,
}

impl PaymentRequest {
    /// Checks required fields and that any echoed target state is the payment transition.
    pub fn validate(self) -> Result<Payment> {
        let mut violations = Vec::new();

        if self.transaction_id.is_none() {
            violations.push("transaction_id is required".to_string());
        }
        match self.cash_tendered {
            None => violations.push("cash_tendered is required".to_string()),
            Some(cash) if cash < Decimal::ZERO => {
                violations.push(format!("cash_tendered cannot be negative (got {cash})"));
            }
            Some(_) => {}
        }
        if let Some(label) = self.payment_status.as_deref()
            && label != PaymentStatus::Completed.as_str()
        {
            violations.push(format!(
                "payment_status can only be set to \"completed\" (got \"{label}\")"
            ));
        }
        if let Some(label) = self.status.as_deref()
            && label != OrderStatus::PickedUp.as_str()
        {
            violations.push(format!(
                "status must be \"Picked-Up\" when recording a payment (got \"{label}\")"
            ));
        }

        match (self.transaction_id, self.cash_tendered) {
            (Some(transaction_id), Some(cash_tendered)) if violations.is_empty() => Ok(Payment {
                transaction_id,
                cash_tendered,
            }),
            _ => Err(Error::Validation { violations }),
        }
    }
}

/// Records a cash payment and hands the order over to the customer.
///
/// # Errors
/// - `NotFound` if the transaction does not exist
/// - `Validation` if it is already paid or `cash_tendered` is below the total price
///
/// Nothing is written when an error is returned.
#[instrument(skip(db))]
pub async fn process_payment(db: &DatabaseConnection, payment: Payment) -> Result<PaymentReceipt> {
    let txn = db.begin().await?;

    let order = Transaction::find_by_id(payment.transaction_id)
        .one(&txn)
        .await?
        .ok_or(Error::NotFound {
            entity: "Transaction",
            id: payment.transaction_id,
        })?;

    if order.payment_status == PaymentStatus::Completed {
        return Err(already_paid(order.id));
    }
    if payment.cash_tendered < order.total_price {
        return Err(Error::invalid(format!(
            "cash_tendered {} is less than the total price {}",
            payment.cash_tendered, order.total_price
        )));
    }

    let paid_at: DateTime<Utc> = Utc::now();
    let result = Transaction::update_many()
        .set(transaction::ActiveModel {
            payment_status: Set(PaymentStatus::Completed),
            status: Set(OrderStatus::PickedUp),
            payment_date: Set(Some(paid_at)),
            ..Default::default()
        })
        .filter(transaction::Column::Id.eq(order.id))
        .filter(transaction::Column::PaymentStatus.eq(PaymentStatus::Pending))
        .exec(&txn)
        .await?;

    if result.rows_affected == 0 {
        warn!(transaction_id = order.id, "Payment raced with another payment");
        return Err(already_paid(order.id));
    }

    txn.commit().await?;

    let change = pricing::change_due(payment.cash_tendered, order.total_price);
    info!(
        transaction_id = order.id,
        total_price = %order.total_price,
        change = %change,
        "Payment completed"
    );

    Ok(PaymentReceipt {
        transaction: transaction::Model {
            status: OrderStatus::PickedUp,
            payment_status: PaymentStatus::Completed,
            payment_date: Some(paid_at),
            ..order
        },
        change,
    })
}

fn already_paid(transaction_id: i64) -> Error {
    Error::invalid(format!("Transaction {transaction_id} has already been paid"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::transaction::{
        BulkStatusUpdate, TransactionEdit, bulk_update_status, edit_transaction,
        get_transaction_by_id,
    };
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::collections::BTreeSet;

    #[test]
    fn test_payment_request_validation() {
        let err = PaymentRequest::default().validate().unwrap_err();
        assert!(matches!(err, Error::Validation { ref violations } if violations.len() == 2));

        let wrong_target = PaymentRequest {
            transaction_id: Some(1),
            cash_tendered: Some(Decimal::from(100)),
            payment_status: Some("pending".to_string()),
            status: Some("Pending".to_string()),
        };
        assert!(matches!(
            wrong_target.validate(),
            Err(Error::Validation { ref violations }) if violations.len() == 2
        ));

        let ok = PaymentRequest {
            transaction_id: Some(1),
            cash_tendered: Some(Decimal::from(100)),
            payment_status: Some("completed".to_string()),
            status: Some("Picked-Up".to_string()),
        }
        .validate()
        .unwrap();
        assert_eq!(ok.cash_tendered, Decimal::from(100));
    }

    #[tokio::test]
    async fn test_payment_for_missing_transaction_mock() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results([Vec::<transaction::Model>::new()])
            .into_connection();

        let result = process_payment(
            &db,
            Payment {
                transaction_id: 77,
                cash_tendered: Decimal::from(10),
            },
        )
        .await;
        assert!(matches!(
            result,
            Err(Error::NotFound {
                entity: "Transaction",
                id: 77
            })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_payment_completes_order_and_returns_change() -> Result<()> {
        let (db, fixture) = setup_with_catalog().await?;
        let order = create_test_transaction(&db, &fixture, Decimal::from(3)).await?;
        assert_eq!(order.total_price, Decimal::from(75));

        let before = Utc::now();
        let receipt = process_payment(
            &db,
            Payment {
                transaction_id: order.id,
                cash_tendered: Decimal::from(100),
            },
        )
        .await?;
        let after = Utc::now();

        assert_eq!(receipt.change, Decimal::from(25));
        assert_eq!(receipt.transaction.status, OrderStatus::PickedUp);
        assert_eq!(receipt.transaction.payment_status, PaymentStatus::Completed);

        let stored = get_transaction_by_id(&db, order.id).await?.unwrap();
        assert_eq!(stored, receipt.transaction);
        let paid_at = stored.payment_date.unwrap();
        assert!(paid_at >= before && paid_at <= after);
        Ok(())
    }

    #[tokio::test]
    async fn test_insufficient_cash_changes_nothing() -> Result<()> {
        let (db, fixture) = setup_with_catalog().await?;
        let order = create_test_transaction(&db, &fixture, Decimal::from(3)).await?;

        let result = process_payment(
            &db,
            Payment {
                transaction_id: order.id,
                cash_tendered: Decimal::from(50),
            },
        )
        .await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let stored = get_transaction_by_id(&db, order.id).await?.unwrap();
        assert_eq!(stored, order);
        Ok(())
    }

    #[tokio::test]
    async fn test_exact_cash_gives_no_change() -> Result<()> {
        let (db, fixture) = setup_with_catalog().await?;
        let order = create_test_transaction(&db, &fixture, Decimal::from(3)).await?;

        let receipt = process_payment(
            &db,
            Payment {
                transaction_id: order.id,
                cash_tendered: Decimal::from(75),
            },
        )
        .await?;
        assert_eq!(receipt.change, Decimal::ZERO);
        Ok(())
    }

    #[tokio::test]
    async fn test_payment_is_terminal() -> Result<()> {
        let (db, fixture) = setup_with_catalog().await?;
        let order = create_test_transaction(&db, &fixture, Decimal::from(3)).await?;
        let receipt = process_payment(
            &db,
            Payment {
                transaction_id: order.id,
                cash_tendered: Decimal::from(100),
            },
        )
        .await?;

        let again = process_payment(
            &db,
            Payment {
                transaction_id: order.id,
                cash_tendered: Decimal::from(100),
            },
        )
        .await;
        assert!(matches!(again, Err(Error::Validation { .. })));

        let restaged = bulk_update_status(
            &db,
            BulkStatusUpdate {
                transaction_ids: BTreeSet::from([order.id]),
                status: OrderStatus::Pending,
            },
        )
        .await?;
        assert_eq!(restaged, 0);

        let edited = edit_transaction(
            &db,
            TransactionEdit {
                transaction_id: order.id,
                user_id: fixture.user.id,
                cloth_id: fixture.cloth.id,
                detergent_id: fixture.detergent.id,
                quantity: Decimal::from(3),
                status: OrderStatus::ReadyToPickUp,
            },
        )
        .await;
        assert!(matches!(edited, Err(Error::Validation { .. })));

        let stored = get_transaction_by_id(&db, order.id).await?.unwrap();
        assert_eq!(stored, receipt.transaction);
        Ok(())
    }
}
