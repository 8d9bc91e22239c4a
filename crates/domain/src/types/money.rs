//! Exact decimal money
//!
//! Every monetary value, rate, quantity and hour count in the engine is a
//! [`Decimal`]. Rounding only happens where a computation explicitly asks for
//! it (the retention amount); all other sums and products stay exact.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::{Result, SiteLedgerError};

/// Monetary amount in the organization's currency.
pub type Money = Decimal;

/// Round `value` to `scale` decimal places, half away from zero.
pub fn round_money(value: Decimal, scale: u32) -> Money {
    value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero)
}

/// Reject negative values for `field`.
///
/// # Errors
/// Returns `SiteLedgerError::InvalidArgument` when `value < 0`.
pub fn ensure_non_negative(field: &str, value: Decimal) -> Result<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(SiteLedgerError::invalid(field, format!("must be >= 0, got {value}")));
    }
    Ok(())
}
