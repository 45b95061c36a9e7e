//! Coupons
//!
//! A coupon is passed explicitly to every evaluation; there is no ambient "current coupon".
//! [`CouponStore`] is the read side of whatever holds the user's active coupon.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};

use crate::discounts::{DiscountError, ensure_same_currency, percent_of_minor, round_minor};

/// How a coupon reduces the subtotal.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DiscountType {
    /// A share of the subtotal
    Percentage,

    /// A fixed amount
    Fixed,
}

/// Discount carried by a coupon.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum CouponDiscount<'a> {
    /// Take a percentage off the subtotal (e.g., "15% off")
    Percentage(Percentage),

    /// Take a fixed amount off the subtotal (e.g., "£2 off")
    Fixed(Money<'a, Currency>),
}

/// A coupon the user has attached.
#[derive(Debug, Clone, PartialEq)]
pub struct Coupon<'a> {
    /// Coupon id
    pub id: String,

    /// Coupon title
    pub title: String,

    /// Discount applied when eligible
    pub discount: CouponDiscount<'a>,

    /// Subtotal below which the coupon yields nothing; `None` means no minimum
    pub min_purchase: Option<Money<'a, Currency>>,

    /// Cap on a percentage discount; ignored for fixed coupons
    pub max_discount: Option<Money<'a, Currency>>,
}

impl<'a> Coupon<'a> {
    /// Create a percentage coupon with no minimum and no cap.
    pub fn percentage(id: impl Into<String>, title: impl Into<String>, percent: Percentage) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            discount: CouponDiscount::Percentage(percent),
            min_purchase: None,
            max_discount: None,
        }
    }

    /// Create a fixed-amount coupon with no minimum.
    pub fn fixed(id: impl Into<String>, title: impl Into<String>, amount: Money<'a, Currency>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            discount: CouponDiscount::Fixed(amount),
            min_purchase: None,
            max_discount: None,
        }
    }

    /// Set the minimum purchase.
    #[must_use]
    pub fn with_min_purchase(self, min_purchase: Money<'a, Currency>) -> Self {
        Self {
            min_purchase: Some(min_purchase),
            ..self
        }
    }

    /// Set the percentage cap.
    #[must_use]
    pub fn with_max_discount(self, max_discount: Money<'a, Currency>) -> Self {
        Self {
            max_discount: Some(max_discount),
            ..self
        }
    }

    /// Return the discount type
    pub const fn discount_type(&self) -> DiscountType {
        match self.discount {
            CouponDiscount::Percentage(_) => DiscountType::Percentage,
            CouponDiscount::Fixed(_) => DiscountType::Fixed,
        }
    }

    /// Whether the subtotal reaches the coupon's minimum purchase.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::CurrencyMismatch`] if the minimum is in another currency.
    pub fn is_eligible(&self, subtotal: &Money<'a, Currency>) -> Result<bool, DiscountError> {
        let Some(min_purchase) = &self.min_purchase else {
            return Ok(true);
        };

        ensure_same_currency(min_purchase, subtotal)?;

        Ok(subtotal.to_minor_units() >= min_purchase.to_minor_units())
    }
}

/// Read access to the user's active coupon.
pub trait CouponStore<'a> {
    /// The active coupon, if any.
    fn active(&self) -> Option<&Coupon<'a>>;

    /// Detach the active coupon.
    fn clear(&mut self);
}

/// In-memory [`CouponStore`] holding at most one coupon.
#[derive(Debug, Clone, Default)]
pub struct ActiveCoupon<'a> {
    coupon: Option<Coupon<'a>>,
}

impl<'a> ActiveCoupon<'a> {
    /// Create a store holding the given coupon.
    pub fn new(coupon: Coupon<'a>) -> Self {
        Self {
            coupon: Some(coupon),
        }
    }

    /// Create an empty store.
    pub fn empty() -> Self {
        Self { coupon: None }
    }
}

impl<'a> CouponStore<'a> for ActiveCoupon<'a> {
    fn active(&self) -> Option<&Coupon<'a>> {
        self.coupon.as_ref()
    }

    fn clear(&mut self) {
        self.coupon = None;
    }
}

/// Compute the discount a coupon yields on a subtotal.
///
/// - No coupon, or a subtotal below the minimum purchase: zero.
/// - Fixed: the coupon amount, clamped to the subtotal.
/// - Percentage: `subtotal × percent`, capped by `max_discount` when set and by the subtotal.
///
/// The result is rounded to whole minor units (halves away from zero) only at the end.
///
/// # Errors
///
/// Returns a [`DiscountError`] if:
/// - a coupon amount is in a different currency to the subtotal.
/// - the percentage calculation overflows.
pub fn compute_discount<'a>(
    coupon: Option<&Coupon<'a>>,
    subtotal: Money<'a, Currency>,
) -> Result<Money<'a, Currency>, DiscountError> {
    let currency = subtotal.currency();
    let zero = Money::from_minor(0, currency);

    let Some(coupon) = coupon else {
        return Ok(zero);
    };

    if !coupon.is_eligible(&subtotal)? {
        return Ok(zero);
    }

    let subtotal_minor = Decimal::from(subtotal.to_minor_units().max(0));

    let discount = match &coupon.discount {
        CouponDiscount::Fixed(amount) => {
            ensure_same_currency(amount, &subtotal)?;

            Decimal::from(amount.to_minor_units())
        }
        CouponDiscount::Percentage(percent) => {
            let raw = percent_of_minor(percent, subtotal.to_minor_units())?;

            match &coupon.max_discount {
                Some(cap) => {
                    ensure_same_currency(cap, &subtotal)?;

                    raw.min(Decimal::from(cap.to_minor_units()))
                }
                None => raw,
            }
        }
    };

    let clamped = discount.min(subtotal_minor).max(Decimal::ZERO);

    Ok(Money::from_minor(round_minor(clamped)?, currency))
}
