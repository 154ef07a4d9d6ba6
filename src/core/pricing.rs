//! Pricing rules for laundry orders.
//!
//! The cloth rate scales with the weight of the order; the detergent is a flat charge added once
//! per order. No rounding happens here: amounts keep full decimal precision and formatting to two
//! places is left to whoever displays them.

use rust_decimal::Decimal;

/// Computes the total price of an order.
///
/// `total = cloth_price_per_item * quantity + detergent_price`
///
/// Returns `None` if the result does not fit in a [`Decimal`].
#[must_use]
pub fn compute_total(
    cloth_price_per_item: Decimal,
    detergent_price: Decimal,
    quantity: Decimal,
) -> Option<Decimal> {
    cloth_price_per_item
        .checked_mul(quantity)?
        .checked_add(detergent_price)
}

/// Change owed to a customer who hands over `cash_tendered` for a bill of `total_price`.
///
/// Never negative; the amount is for display and is not stored.
#[must_use]
pub fn change_due(cash_tendered: Decimal, total_price: Decimal) -> Decimal {
    cash_tendered
        .checked_sub(total_price)
        .map_or(Decimal::ZERO, |change| change.max(Decimal::ZERO))
}
