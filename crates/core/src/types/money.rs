//! Decimal money helpers.
//!
//! Amounts are plain [`Decimal`] values in the store currency's standard
//! unit (dollars, not cents). The store sells in a single currency, so no
//! currency code travels with the amount.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places a stored amount is rounded to.
pub const MONEY_SCALE: u32 = 2;

/// Round an amount to cents, midpoint away from zero.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Format an amount for display, e.g. `$19.99`.
#[must_use]
pub fn format_money(amount: Decimal) -> String {
    format!("${:.2}", round_money(amount))
}
