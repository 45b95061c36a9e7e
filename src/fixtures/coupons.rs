//! Coupon Fixtures

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;

use crate::{
    coupons::Coupon,
    fixtures::{
        FixtureError,
        catalog::{parse_percentage, parse_price},
    },
};

/// Wrapper for coupons in YAML
#[derive(Debug, Deserialize)]
pub struct CouponsFixture {
    /// Map of coupon id -> coupon fixture
    pub coupons: FxHashMap<String, CouponFixture>,
}

/// Coupon Fixture
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CouponFixture {
    /// Percentage off the subtotal
    Percentage {
        /// Coupon title
        title: String,

        /// Percentage (e.g., "15%" or "0.15")
        value: String,

        /// Optional minimum purchase (e.g., "10.00 GBP")
        #[serde(default)]
        min_purchase: Option<String>,

        /// Optional discount cap (e.g., "1.50 GBP")
        #[serde(default)]
        max_discount: Option<String>,
    },

    /// Fixed amount off the subtotal
    Fixed {
        /// Coupon title
        title: String,

        /// Amount (e.g., "5.00 GBP")
        value: String,

        /// Optional minimum purchase (e.g., "10.00 GBP")
        #[serde(default)]
        min_purchase: Option<String>,
    },
}

impl CouponFixture {
    /// Convert into a coupon with the given id, in the given currency.
    ///
    /// # Errors
    ///
    /// Returns an error if an amount or percentage is malformed, or an amount is not in
    /// `currency`.
    pub fn into_coupon<'a>(
        self,
        id: &str,
        currency: &'static Currency,
    ) -> Result<Coupon<'a>, FixtureError> {
        let money = |s: &str| -> Result<Money<'a, Currency>, FixtureError> {
            let (minor_units, parsed) = parse_price(s)?;

            if parsed != currency {
                return Err(FixtureError::CurrencyMismatch(
                    currency.iso_alpha_code.to_string(),
                    parsed.iso_alpha_code.to_string(),
                ));
            }

            Ok(Money::from_minor(minor_units, parsed))
        };

        match self {
            CouponFixture::Percentage {
                title,
                value,
                min_purchase,
                max_discount,
            } => {
                let mut coupon = Coupon::percentage(id, title, parse_percentage(&value)?);

                if let Some(min_purchase) = min_purchase {
                    coupon = coupon.with_min_purchase(money(&min_purchase)?);
                }

                if let Some(max_discount) = max_discount {
                    coupon = coupon.with_max_discount(money(&max_discount)?);
                }

                Ok(coupon)
            }
            CouponFixture::Fixed {
                title,
                value,
                min_purchase,
            } => {
                let mut coupon = Coupon::fixed(id, title, money(&value)?);

                if let Some(min_purchase) = min_purchase {
                    coupon = coupon.with_min_purchase(money(&min_purchase)?);
                }

                Ok(coupon)
            }
        }
    }
}
