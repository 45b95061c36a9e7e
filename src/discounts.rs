//! Discounts
//!
//! Decimal helpers shared by coupon evaluation. Percentages are applied to amounts in minor
//! units and kept unrounded until the final discount is produced.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

/// Errors specific to discount calculations.
#[derive(Debug, Error)]
pub enum DiscountError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// A coupon amount is in a different currency to the subtotal (coupon, subtotal).
    #[error("Coupon amount has currency {0}, but subtotal has currency {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Apply a percentage to an amount in minor units, without rounding.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the multiplication overflows.
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<Decimal, DiscountError> {
    let minor = Decimal::from_i64(minor).ok_or(DiscountError::PercentConversion)?;

    ((*percent) * Decimal::ONE) // decimal_percentage crate doesn't actually expose the underlying Decimal
        .checked_mul(minor)
        .ok_or(DiscountError::PercentConversion)
}

/// Round a minor-unit amount to a whole number of minor units, halves away from zero.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the rounded value does not fit in an `i64`.
pub fn round_minor(amount: Decimal) -> Result<i64, DiscountError> {
    amount
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(DiscountError::PercentConversion)
}

/// Return `CurrencyMismatch` unless both amounts share a currency.
pub(crate) fn ensure_same_currency(
    amount: &Money<'_, Currency>,
    subtotal: &Money<'_, Currency>,
) -> Result<(), DiscountError> {
    if amount.currency() == subtotal.currency() {
        Ok(())
    } else {
        Err(DiscountError::CurrencyMismatch(
            amount.currency().iso_alpha_code,
            subtotal.currency().iso_alpha_code,
        ))
    }
}
