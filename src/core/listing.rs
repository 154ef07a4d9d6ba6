//! Read-only views over transactions for the order, payment and report screens.
//!
//! Listings join in the customer's name and sort newest first. None of them write.

use std::{fmt, str::FromStr};

use crate::{
    entities::{OrderStatus, PaymentStatus, Transaction, User, transaction, user},
    errors::{Error, Result},
};
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, prelude::*};
use serde::Serialize;

/// A transaction together with the name of the customer who placed it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionView {
    /// The stored transaction
    #[serde(flatten)]
    pub transaction: transaction::Model,
    /// Customer name, `None` if the user row is missing
    pub user_name: Option<String>,
}

/// One row of the monthly completed-payments report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedTransaction {
    /// Transaction id
    pub id: i64,
    /// Name of the paying customer
    pub customer_name: String,
    /// When the payment was completed
    pub date: DateTime<Utc>,
    /// Amount paid
    pub amount: Decimal,
    /// Fulfillment stage, always `Picked-Up`
    pub status: OrderStatus,
}

/// A calendar month in `YYYY-MM` form, as used by the monthly report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillingMonth {
    year: i32,
    month: u32,
}

impl BillingMonth {
    /// Builds a month from its parts, `None` if `month` is not in `1..=12`.
    #[must_use]
    pub fn new(year: i32, month: u32) -> Option<Self> {
        ((1..=12).contains(&month) && (0..=9999).contains(&year)).then_some(Self { year, month })
    }

    /// Half-open UTC range `[first instant of the month, first instant of the next month)`.
    pub fn range(self) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        let start = Utc.with_ymd_and_hms(self.year, self.month, 1, 0, 0, 0).single();
        let end = Utc.with_ymd_and_hms(next_year, next_month, 1, 0, 0, 0).single();
        start.zip(end).ok_or_else(|| Error::invalid("Invalid month format"))
    }
}

impl FromStr for BillingMonth {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::invalid("Invalid month format");
        let bytes = s.as_bytes();
        if bytes.len() != 7 || bytes[4] != b'-' {
            return Err(invalid());
        }
        let digits = |part: &[u8]| part.iter().all(u8::is_ascii_digit);
        if !digits(&bytes[..4]) || !digits(&bytes[5..]) {
            return Err(invalid());
        }
        let year = s[..4].parse().map_err(|_| invalid())?;
        let month = s[5..].parse().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }
}

impl fmt::Display for BillingMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

fn with_user_names(rows: Vec<(transaction::Model, Option<user::Model>)>) -> Vec<TransactionView> {
    rows.into_iter()
        .map(|(transaction, user)| TransactionView {
            transaction,
            user_name: user.map(|u| u.name),
        })
        .collect()
}

/// Every transaction, newest first.
pub async fn fetch_all_transactions(db: &DatabaseConnection) -> Result<Vec<TransactionView>> {
    let rows = Transaction::find()
        .find_also_related(User)
        .order_by_desc(transaction::Column::CreatedAt)
        .order_by_desc(transaction::Column::Id)
        .all(db)
        .await?;
    Ok(with_user_names(rows))
}

/// Unpaid orders that are still in the shop (`Pending` or `Ready to Pick-Up`), newest first.
pub async fn fetch_pending_transactions(db: &DatabaseConnection) -> Result<Vec<TransactionView>> {
    let rows = Transaction::find()
        .find_also_related(User)
        .filter(
            transaction::Column::Status.is_in([OrderStatus::Pending, OrderStatus::ReadyToPickUp]),
        )
        .filter(transaction::Column::PaymentStatus.eq(PaymentStatus::Pending))
        .order_by_desc(transaction::Column::CreatedAt)
        .order_by_desc(transaction::Column::Id)
        .all(db)
        .await?;
    Ok(with_user_names(rows))
}

/// Orders paid and picked up during `month`, most recent payment first.
pub async fn fetch_completed_transactions(
    db: &DatabaseConnection,
    month: BillingMonth,
) -> Result<Vec<CompletedTransaction>> {
    let (start, end) = month.range()?;

    let rows = Transaction::find()
        .find_also_related(User)
        .filter(transaction::Column::Status.eq(OrderStatus::PickedUp))
        .filter(transaction::Column::PaymentStatus.eq(PaymentStatus::Completed))
        .filter(transaction::Column::PaymentDate.gte(start))
        .filter(transaction::Column::PaymentDate.lt(end))
        .order_by_desc(transaction::Column::PaymentDate)
        .order_by_desc(transaction::Column::Id)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(transaction, user)| {
            Some(CompletedTransaction {
                id: transaction.id,
                customer_name: user?.name,
                date: transaction.payment_date?,
                amount: transaction.total_price,
                status: transaction.status,
            })
        })
        .collect())
}

/// All orders of one customer, newest first.
pub async fn fetch_transactions_by_user(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<transaction::Model>> {
    Transaction::find()
        .filter(transaction::Column::UserId.eq(user_id))
        .order_by_desc(transaction::Column::CreatedAt)
        .order_by_desc(transaction::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// A single order with its customer name.
pub async fn fetch_transaction(
    db: &DatabaseConnection,
    transaction_id: i64,
) -> Result<Option<TransactionView>> {
    let row = Transaction::find_by_id(transaction_id)
        .find_also_related(User)
        .one(db)
        .await?;
    Ok(row.map(|(transaction, user)| TransactionView {
        transaction,
        user_name: user.map(|u| u.name),
    }))
}
